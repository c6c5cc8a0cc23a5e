use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use cloudlink::topics::TopicSet;

fn bench_topic_derivation(c: &mut Criterion) {
    c.bench_function("topic_set_for_device", |b| {
        b.iter(|| TopicSet::for_device(black_box("dev-42")).unwrap())
    });
}

fn bench_route(c: &mut Criterion) {
    let topics = TopicSet::for_device("dev-42").unwrap();
    c.bench_function("route_notification_topic", |b| {
        b.iter(|| topics.route(black_box("devices/dev-42/firmware-update")))
    });
    c.bench_function("route_unknown_topic", |b| {
        b.iter(|| topics.route(black_box("rooms/kitchen/light")))
    });
}

criterion_group!(benches, bench_topic_derivation, bench_route);
criterion_main!(benches);
