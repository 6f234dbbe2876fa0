use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lichtbild::query::{compose, Fragment, Relation};
use lichtbild::repo::{
    BansRepository, CommentsRepository, FollowsRepository, LikesRepository, UsersRepository,
};
use lichtbild::workers::{run_all, Job, JobOutput};
use tokio::runtime::Runtime;

fn gallery_relations() -> Vec<Relation> {
    vec![
        UsersRepository::with_users(),
        LikesRepository::with_total_likes(),
        CommentsRepository::with_total_comments(),
        LikesRepository::with_liked_by(1),
        UsersRepository::filter_by_user_id(2),
        BansRepository::without_banned(1),
        BansRepository::without_banners(1),
    ]
}

fn stream_relations() -> Vec<Relation> {
    vec![
        UsersRepository::with_users(),
        LikesRepository::with_total_likes(),
        CommentsRepository::with_total_comments(),
        LikesRepository::with_liked_by(1),
        FollowsRepository::filter_by_follower_id(1),
        BansRepository::without_banned(1),
        BansRepository::without_banners(1),
    ]
}

fn benchmark_compose(c: &mut Criterion) {
    let gallery = gallery_relations();
    let stream = stream_relations();

    c.bench_function("compose_gallery", |b| {
        b.iter(|| black_box(compose(black_box("photo"), &gallery)))
    });
    c.bench_function("compose_stream", |b| {
        b.iter(|| black_box(compose(black_box("photo"), &stream)))
    });
}

fn benchmark_compose_filter_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose_filter_chain");

    for count in [2usize, 8, 32].iter() {
        let relations: Vec<Relation> = (0..*count)
            .map(|i| {
                Relation::new(move |entity| {
                    Fragment::filter(format!("{}s.col_{} = {}", entity, i, i))
                })
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &relations, |b, relations| {
            b.iter(|| black_box(compose("photo", relations)))
        });
    }
    group.finish();
}

fn benchmark_fan_out(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    c.bench_function("fan_out_two_jobs", |b| {
        b.iter(|| {
            rt.block_on(async {
                let stream = run_all(vec![
                    Job::new(async { Ok(JobOutput::Photos(Vec::new())) }),
                    Job::new(async { Ok(JobOutput::Count(0)) }),
                ]);
                black_box(stream.collect_all().await)
            })
        })
    });
}

criterion_group!(benches, benchmark_compose, benchmark_compose_filter_chain, benchmark_fan_out);
criterion_main!(benches);
