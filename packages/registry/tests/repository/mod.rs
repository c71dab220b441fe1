use std::collections::HashSet;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use filemesh_primitives::file::{FileDescriptor, FileId};
use filemesh_primitives::peer::PeerIdentity;
use filemesh_registry::state::{PersistedFile, PersistentRegistry};
use filemesh_registry::{Error, RegistryMutexParkingLot, RegistryMutexStd};
use rstest::{fixture, rstest};

use crate::common::repo::Repo;

const TIMEOUT: Duration = Duration::from_millis(60_000);

#[fixture]
fn standard() -> Repo {
    Repo::MutexStd(RegistryMutexStd::default())
}

#[fixture]
fn parking_lot() -> Repo {
    Repo::MutexParkingLot(RegistryMutexParkingLot::default())
}

fn a_seed(n: u8) -> SocketAddrV4 {
    SocketAddrV4::new(Ipv4Addr::new(126, 0, 0, n), 9000 + u16::from(n))
}

fn at(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn cutoff_at(millis: u64) -> Duration {
    at(millis).saturating_sub(TIMEOUT)
}

#[fixture]
fn persistent_empty() -> PersistentRegistry {
    PersistentRegistry::default()
}

#[fixture]
fn persistent_single() -> PersistentRegistry {
    vec![PersistedFile {
        descriptor: FileDescriptor::new(FileId(1), "movie.mp4".to_owned(), 1_000_000),
        seeds: vec![PeerIdentity::new(Ipv4Addr::new(126, 0, 0, 1), 9001, at(100_000))],
    }]
}

#[fixture]
fn persistent_three() -> PersistentRegistry {
    vec![
        PersistedFile {
            descriptor: FileDescriptor::new(FileId(4), "a".to_owned(), 1),
            seeds: vec![],
        },
        PersistedFile {
            descriptor: FileDescriptor::new(FileId(2), "b".to_owned(), 2),
            seeds: vec![
                PeerIdentity::new(Ipv4Addr::new(126, 0, 0, 1), 9001, at(100_000)),
                PeerIdentity::new(Ipv4Addr::new(126, 0, 0, 2), 9002, at(110_000)),
            ],
        },
        PersistedFile {
            descriptor: FileDescriptor::new(FileId(9), "c".to_owned(), 3),
            seeds: vec![PeerIdentity::new(Ipv4Addr::new(126, 0, 0, 2), 9002, at(110_000))],
        },
    ]
}

#[rstest]
fn it_should_assign_pairwise_distinct_ids(#[values(standard(), parking_lot())] repo: Repo) {
    let ids = (0..100)
        .map(|i| repo.upload(&format!("file-{i}"), i, a_seed(1), at(0)).unwrap().id)
        .collect::<HashSet<_>>();

    assert_eq!(ids.len(), 100);
}

#[rstest]
fn it_should_assign_pairwise_distinct_ids_to_concurrent_uploads(#[values(standard(), parking_lot())] repo: Repo) {
    let repo = Arc::new(repo);

    let handles = (0..8_u8)
        .map(|n| {
            let repo = repo.clone();
            thread::spawn(move || {
                (0..50)
                    .map(|i| repo.upload(&format!("file-{n}-{i}"), 1, a_seed(n), at(0)).unwrap().id)
                    .collect::<Vec<_>>()
            })
        })
        .collect::<Vec<_>>();

    let ids = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect::<HashSet<_>>();

    assert_eq!(ids.len(), 400);
    assert_eq!(repo.list_files().len(), 400);
}

#[rstest]
fn it_should_list_the_files_in_catalog_order(#[values(standard(), parking_lot())] repo: Repo) {
    let a = repo.add_file("a", 1).unwrap();
    let b = repo.upload("b", 2, a_seed(1), at(0)).unwrap();

    assert_eq!(repo.list_files(), vec![a, b]);
}

#[rstest]
fn the_uploader_should_be_a_seed_of_the_uploaded_file(#[values(standard(), parking_lot())] repo: Repo) {
    let file = repo.upload("movie.mp4", 1_000_000, a_seed(1), at(1_000)).unwrap();

    let seeds = repo.active_seeds(file.id, cutoff_at(1_000)).unwrap();

    assert_eq!(seeds, vec![PeerIdentity::from((a_seed(1), at(1_000)))]);
}

#[rstest]
fn it_should_fail_with_not_found_for_an_unknown_file(#[values(standard(), parking_lot())] repo: Repo) {
    assert!(matches!(
        repo.active_seeds(FileId(3), cutoff_at(0)),
        Err(Error::FileNotFound { file_id: FileId(3), .. })
    ));
    assert!(matches!(
        repo.register_seed(FileId(3), a_seed(1), at(0)),
        Err(Error::FileNotFound { .. })
    ));
}

#[rstest]
fn updating_twice_should_leave_a_single_entry_for_the_peer(#[values(standard(), parking_lot())] repo: Repo) {
    let a = repo.add_file("a", 1).unwrap();
    let b = repo.add_file("b", 1).unwrap();

    repo.update(&[a.id, b.id], a_seed(2), at(0)).unwrap();
    repo.update(&[a.id, b.id], a_seed(2), at(10)).unwrap();

    for file_id in [a.id, b.id] {
        let seeds = repo.active_seeds(file_id, cutoff_at(10)).unwrap();
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].last_seen, at(10));
    }
}

#[rstest]
fn an_update_with_an_unknown_file_should_not_apply_anything(#[values(standard(), parking_lot())] repo: Repo) {
    let a = repo.add_file("a", 1).unwrap();

    assert!(repo.update(&[a.id, FileId(77)], a_seed(2), at(0)).is_err());

    assert!(repo.active_seeds(a.id, cutoff_at(0)).unwrap().is_empty());
}

#[rstest]
fn a_seed_not_refreshed_within_the_timeout_should_be_evicted(#[values(standard(), parking_lot())] repo: Repo) {
    let file = repo.upload("a", 1, a_seed(1), at(0)).unwrap();
    repo.update(&[file.id], a_seed(2), at(30_000)).unwrap();

    let t0 = 60_000;
    assert_eq!(repo.active_seeds(file.id, cutoff_at(t0)).unwrap().len(), 2);

    let after = t0 + 1;
    let seeds = repo.active_seeds(file.id, cutoff_at(after)).unwrap();

    assert_eq!(seeds.iter().map(PeerIdentity::key).collect::<Vec<_>>(), vec![a_seed(2)]);
}

#[rstest]
fn an_evicted_seed_should_be_able_to_seed_again(#[values(standard(), parking_lot())] repo: Repo) {
    let file = repo.upload("a", 1, a_seed(1), at(0)).unwrap();

    assert!(repo.active_seeds(file.id, cutoff_at(70_000)).unwrap().is_empty());

    repo.update(&[file.id], a_seed(1), at(70_000)).unwrap();

    assert_eq!(repo.active_seeds(file.id, cutoff_at(70_000)).unwrap().len(), 1);
}

#[rstest]
fn the_sweep_should_remove_only_the_stale_seeds(#[values(standard(), parking_lot())] repo: Repo) {
    let file = repo.upload("a", 1, a_seed(1), at(0)).unwrap();
    repo.update(&[file.id], a_seed(2), at(50_000)).unwrap();

    assert_eq!(repo.remove_inactive_seeds(cutoff_at(100_000)), 1);
    assert_eq!(repo.active_seeds(file.id, cutoff_at(100_000)).unwrap().len(), 1);
}

#[rstest]
#[case::empty(persistent_empty())]
#[case::single(persistent_single())]
#[case::three(persistent_three())]
fn it_should_reproduce_an_imported_snapshot(
    #[values(standard(), parking_lot())] repo: Repo,
    #[case] persistent: PersistentRegistry,
) {
    repo.import(&persistent).unwrap();

    let exported = repo.export(cutoff_at(120_000));

    assert_eq!(exported, persistent);
    for (exported, expected) in exported.iter().zip(persistent.iter()) {
        let last_seen = exported.seeds.iter().map(|seed| seed.last_seen).collect::<Vec<_>>();
        let expected_last_seen = expected.seeds.iter().map(|seed| seed.last_seen).collect::<Vec<_>>();
        assert_eq!(last_seen, expected_last_seen);
    }
}

#[rstest]
fn it_should_not_export_expired_seeds(#[values(standard(), parking_lot())] repo: Repo, persistent_three: PersistentRegistry) {
    repo.import(&persistent_three).unwrap();

    let exported = repo.export(cutoff_at(165_000));

    assert_eq!(exported[1].seeds.iter().map(PeerIdentity::key).collect::<Vec<_>>(), vec![a_seed(2)]);
}

#[rstest]
fn it_should_continue_numbering_after_the_highest_imported_id(
    #[values(standard(), parking_lot())] repo: Repo,
    persistent_three: PersistentRegistry,
) {
    repo.import(&persistent_three).unwrap();

    assert_eq!(repo.add_file("d", 4).unwrap().id, FileId(10));
}

#[rstest]
fn a_rejected_import_should_leave_the_registry_untouched(
    #[values(standard(), parking_lot())] repo: Repo,
    persistent_single: PersistentRegistry,
) {
    let file = repo.add_file("kept", 1).unwrap();

    let mut duplicated = persistent_single.clone();
    duplicated.extend(persistent_single);

    assert!(matches!(repo.import(&duplicated), Err(Error::DuplicateFileId { .. })));
    assert_eq!(repo.list_files(), vec![file]);
}
