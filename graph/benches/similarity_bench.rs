use criterion::{black_box, criterion_group, criterion_main, Criterion};
use graph::ReviewGraph;
use reviewgraph_core::model::{Review, Role};

fn build_graph(products: usize, reviewers: usize, reviews_per_reviewer: usize) -> ReviewGraph {
    let mut graph = ReviewGraph::new();
    for p in 0..products {
        graph.add_vertex(format!("P{}", p), Role::Product);
    }
    for r in 0..reviewers {
        let reviewer = format!("R{}", r);
        graph.add_vertex(reviewer.clone(), Role::Reviewer);
        for k in 0..reviews_per_reviewer {
            let product = format!("P{}", (r * 7 + k * 13) % products);
            let rating = ((r + k) % 5 + 1) as f64;
            let review = Review::new(rating, "05 01, 2015", "benchmark review text");
            graph
                .add_edge(&product, &reviewer, review)
                .expect("bench vertices exist");
        }
    }
    graph
}

fn bench_similarity(c: &mut Criterion) {
    let graph = build_graph(2_000, 10_000, 8);

    c.bench_function("similar_product_reviews", |b| {
        b.iter(|| graph.similar_product_reviews(black_box("P42")).unwrap())
    });

    c.bench_function("neighbouring_reviews", |b| {
        b.iter(|| graph.neighbouring_reviews(black_box("P42")).unwrap())
    });
}

criterion_group!(benches, bench_similarity);
criterion_main!(benches);
