//! Benchmarks for featured assignment
//!
//! Measures the greedy assignment pass over an in-memory catalog, where
//! popular titles overlap heavily between genres.

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use marquee::catalog::{Catalog, DiscoverPage};
use marquee::featured::{assign_featured, FallbackTables, FeaturedOptions};
use marquee_common::{CatalogItem, Category, CategoryId, MediaKind};

const PAGE_SIZE: i64 = 20;

/// Catalog where every genre's listing shares most titles with its
/// neighbours, so later genres must skip already-used ids.
struct OverlappingCatalog {
    overlap: i64,
}

#[async_trait]
impl Catalog for OverlappingCatalog {
    async fn discover(
        &self,
        _kind: MediaKind,
        category: CategoryId,
        page: u32,
    ) -> anyhow::Result<DiscoverPage> {
        let start = (category.get() % self.overlap) + i64::from(page - 1) * PAGE_SIZE + 1;
        let results = (start..start + PAGE_SIZE)
            .map(|id| {
                let item = CatalogItem::new(id, format!("Title {id}"));
                // Every third title has no artwork.
                if id % 3 == 0 {
                    item
                } else {
                    item.with_backdrop(format!("/{id}.jpg"))
                }
            })
            .collect();

        Ok(DiscoverPage {
            page,
            results,
            total_pages: Some(3),
        })
    }

    async fn genres(&self, _kind: MediaKind) -> anyhow::Result<Vec<Category>> {
        Ok(Vec::new())
    }
}

fn categories(count: i64) -> Vec<Category> {
    (1..=count)
        .map(|id| Category::new(id, format!("Genre {id}")))
        .collect()
}

fn bench_assignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("assign_featured");
    let tables = FallbackTables::builtin();
    let options = FeaturedOptions::default();
    let catalog = OverlappingCatalog { overlap: 5 };

    for count in [10i64, 19, 50] {
        let genres = categories(count);
        group.bench_with_input(BenchmarkId::new("genres", count), &genres, |b, genres| {
            b.iter(|| {
                tokio_test::block_on(assign_featured(
                    black_box(&catalog),
                    MediaKind::Tv,
                    black_box(genres),
                    &tables,
                    &options,
                ))
            })
        });
    }

    group.finish();
}

fn bench_fallback_tables(c: &mut Criterion) {
    c.bench_function("fallback_tables_builtin", |b| {
        b.iter(|| black_box(FallbackTables::builtin()))
    });

    let tables = FallbackTables::builtin();
    c.bench_function("fallback_tables_lookup", |b| {
        b.iter(|| {
            for id in [18, 99, 10762, 10770, 9648] {
                black_box(tables.related(CategoryId::new(id)));
                black_box(tables.default_image(CategoryId::new(id)));
            }
        })
    });
}

criterion_group!(benches, bench_assignment, bench_fallback_tables);
criterion_main!(benches);
