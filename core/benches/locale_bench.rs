use criterion::{criterion_group, criterion_main, Criterion};
use time::macros::datetime;
use tweets_core::locale::LocaleFilter;
use tweets_core::Record;

fn sample(i: u64) -> Record {
    let location = if i % 10 == 0 { "Kuching, Sarawak" } else { "Bandung, Jawa Barat" };
    Record {
        id: i,
        date: datetime!(2021-01-25 12:00:00),
        text: format!("Vaksinasi tahap {i} dimulai hari ini di puskesmas #vaksin"),
        hashtags: Some(vec!["vaksin".into()]),
        user_name: "dinkes".into(),
        user_location: Some(location.into()),
        user_description: Some("Akun resmi dinas kesehatan".into()),
        user_created: datetime!(2015-03-07 01:02:03),
        user_followers: 100,
        user_friends: 10,
        user_favourites: 5,
        user_verified: false,
        source: "Twitter Web App".into(),
        retweets: 0,
        favorites: 0,
        is_retweet: false,
        reply_to_status: None,
    }
}

fn bench_retain_local(c: &mut Criterion) {
    let filter = LocaleFilter::default();
    let rows: Vec<Record> = (0..3000).map(sample).collect();
    c.bench_function("retain_local_3000", |b| b.iter(|| filter.retain_local(rows.clone())));
}

criterion_group!(benches, bench_retain_local);
criterion_main!(benches);
