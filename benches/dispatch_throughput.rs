use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use signalbus::{Delivery, Event, EventDispatcher, Listener, MatchRule};

const BATCH_SIZES: &[usize] = &[64, 256, 1024];

fn publish_batch(dispatcher: &EventDispatcher, batch: usize) {
    for i in 0..batch {
        dispatcher
            .publish(Event::named(format!("bench:msg-{i}")))
            .expect("publish");
    }
}

fn dispatch_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("immediate_publish");

    for &batch in BATCH_SIZES {
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch), &batch, |b, &size| {
            b.iter(|| {
                let dispatcher = EventDispatcher::default();
                dispatcher.add_listener(Listener::new(
                    MatchRule::glob("bench:*"),
                    Delivery::Blocking,
                    |_| {},
                ));
                publish_batch(&dispatcher, size);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, dispatch_throughput);
criterion_main!(benches);
