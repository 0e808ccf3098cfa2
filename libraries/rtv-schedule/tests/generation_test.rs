//! End-to-end generation scenarios
//!
//! Each test builds a station, snapshots a playlist, runs the generator, and
//! checks the sequence and the state handed back for commit.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rtv_core::types::{
    BlockDuration, BreakConfig, Category, Clip, ClipId, Episode, EpisodeNumber, Playlist,
    PlaylistItem, Show, ShowId, SortBy, Station,
};
use rtv_schedule::{ClipPool, EpisodeIndex, GenerationRequest, Generator, Notice};
use std::collections::BTreeMap;
use std::time::Duration;

// ===== Helpers =====

/// Station with one playlist whose members are `shows`, in order
fn station(shows: &[&str], breaks: BreakConfig) -> Station {
    let mut station = Station::new();
    station
        .create_playlist(
            Playlist::new("Real TV")
                .with_breaks(breaks)
                .with_sort_by(SortBy::ConfigOrder),
        )
        .unwrap();
    for name in shows {
        station.add_show(Show::new(*name)).unwrap();
        station.add_to_playlist("Real TV", name).unwrap();
    }
    station
}

/// Single-season listings, 22 minutes per episode
fn episodes(counts: &[(&str, u32)]) -> EpisodeIndex {
    let mut index = EpisodeIndex::new();
    for &(name, count) in counts {
        index.insert(
            ShowId::new(name),
            (1..=count)
                .map(|e| Episode::new(1, e).with_duration(Duration::from_secs(22 * 60)))
                .collect(),
        );
    }
    index
}

fn clips(count: usize, secs: u64) -> ClipPool {
    let mut library = BTreeMap::new();
    library.insert(
        "ads".to_string(),
        (0..count)
            .map(|i| Clip::new(format!("ad-{i}"), "ads", Duration::from_secs(secs)))
            .collect::<Vec<_>>(),
    );
    ClipPool::new(library, &[]).unwrap()
}

fn single(frequency: u32, min_gap: usize) -> BreakConfig {
    BreakConfig::Single { frequency, min_gap }
}

fn episode_labels(items: &[PlaylistItem]) -> Vec<String> {
    items
        .iter()
        .filter_map(PlaylistItem::as_episode)
        .map(|item| format!("{} {}", item.show, item.episode.number))
        .collect()
}

fn break_positions(items: &[PlaylistItem]) -> Vec<usize> {
    let mut episodes_seen = 0;
    let mut positions = Vec::new();
    for item in items {
        if item.is_episode() {
            episodes_seen += 1;
        } else {
            positions.push(episodes_seen);
        }
    }
    positions
}

// ===== Rotation =====

#[test]
fn short_show_drops_out_of_rotation() {
    let station = station(&["A", "B"], BreakConfig::Disabled);
    let index = episodes(&[("A", 3), ("B", 12)]);
    let pool = ClipPool::empty();
    let generator = Generator::new(station.shows(), &index, &pool);
    let state = station.snapshot(None).unwrap();

    let six = generator
        .generate(
            &state,
            GenerationRequest::new(6).from_start(true),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
    assert_eq!(
        episode_labels(&six.items),
        vec![
            "A S01E01", "B S01E01", "A S01E02", "B S01E02", "A S01E03", "B S01E03"
        ]
    );

    let seven = generator
        .generate(
            &state,
            GenerationRequest::new(7).from_start(true),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
    assert_eq!(episode_labels(&seven.items)[6], "B S01E04");
    assert_eq!(seven.report.dropped_shows, vec!["A".to_string()]);

    let a = seven.state.cursor(&ShowId::new("A"));
    assert!(a.exhausted);
    assert_eq!(
        seven.state.cursor(&ShowId::new("B")).position(),
        EpisodeNumber::new(1, 5)
    );
}

#[test]
fn from_start_episode_sequence_is_deterministic() {
    let station = station(&["A", "B", "C"], single(1, 2));
    let index = episodes(&[("A", 5), ("B", 2), ("C", 9)]);
    let pool = clips(6, 30);
    let generator = Generator::new(station.shows(), &index, &pool);
    let state = station.snapshot(None).unwrap();
    let request = GenerationRequest::new(12).from_start(true);

    let first = generator
        .generate(&state, request, &mut StdRng::seed_from_u64(10))
        .unwrap();
    let second = generator
        .generate(&state, request, &mut StdRng::seed_from_u64(99))
        .unwrap();

    assert_eq!(episode_labels(&first.items), episode_labels(&second.items));
    assert_eq!(first.state.cursors, second.state.cursors);
}

#[test]
fn cursors_carry_over_between_runs() {
    let mut station = station(&["A", "B"], BreakConfig::Disabled);
    let index = episodes(&[("A", 10), ("B", 10)]);
    let pool = ClipPool::empty();

    let first = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(4),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
    station.commit(first.state).unwrap();

    let second = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(2),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
    assert_eq!(episode_labels(&second.items), vec!["A S01E03", "B S01E03"]);
}

#[test]
fn disabling_a_show_between_runs_keeps_the_others() {
    let mut station = station(&["A", "B", "C"], BreakConfig::Disabled);
    let index = episodes(&[("A", 10), ("B", 10), ("C", 10)]);
    let pool = ClipPool::empty();

    let first = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(3),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
    station.commit(first.state).unwrap();
    station.set_enabled("B", false).unwrap();

    let second = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(4),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();

    assert_eq!(
        episode_labels(&second.items),
        vec!["A S01E02", "C S01E02", "A S01E03", "C S01E03"]
    );
    // The disabled show's cursor is carried through untouched
    assert_eq!(
        second.state.cursor(&ShowId::new("B")).position(),
        EpisodeNumber::new(1, 2)
    );
}

#[test]
fn playlists_do_not_share_cursors() {
    let mut station = station(&["A"], BreakConfig::Disabled);
    station
        .create_playlist(Playlist::new("Late Night").with_breaks(BreakConfig::Disabled))
        .unwrap();
    station.add_to_playlist("Late Night", "A").unwrap();
    let index = episodes(&[("A", 10)]);
    let pool = ClipPool::empty();

    let run = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(Some("Real TV")).unwrap(),
            GenerationRequest::new(5),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
    station.commit(run.state).unwrap();

    let late = station.snapshot(Some("Late Night")).unwrap();
    assert_eq!(late.cursor(&ShowId::new("A")).position(), EpisodeNumber::PILOT);
}

#[test]
fn all_exhausted_shows_yield_nothing() {
    let station = station(&["A"], BreakConfig::Disabled);
    let index = episodes(&[("A", 2)]);
    let pool = ClipPool::empty();
    let generator = Generator::new(station.shows(), &index, &pool);

    let run = generator
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(5),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
    assert_eq!(run.report.episodes, 2);

    let again = generator
        .generate(&run.state, GenerationRequest::new(5), &mut StdRng::seed_from_u64(1))
        .unwrap();
    assert!(again.items.is_empty());
    assert_eq!(again.report.notices, vec![Notice::NoActiveShows]);

    let restart = generator
        .generate(
            &run.state,
            GenerationRequest::new(1).from_start(true),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
    assert_eq!(episode_labels(&restart.items), vec!["A S01E01"]);
}

#[test]
fn exhausted_show_returns_when_catalog_grows() {
    let mut station = station(&["A"], BreakConfig::Disabled);
    let pool = ClipPool::empty();

    let short = episodes(&[("A", 2)]);
    let run = Generator::new(station.shows(), &short, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(5),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
    assert!(run.state.cursor(&ShowId::new("A")).exhausted);
    station.commit(run.state).unwrap();

    // S01E03 and a second season appear later
    let mut grown = EpisodeIndex::new();
    grown.insert(
        ShowId::new("A"),
        vec![
            Episode::new(1, 1),
            Episode::new(1, 2),
            Episode::new(1, 3),
            Episode::new(2, 1),
        ],
    );
    let next = Generator::new(station.shows(), &grown, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(5),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();

    assert_eq!(episode_labels(&next.items), vec!["A S01E03", "A S02E01"]);
    assert!(!next.report.notices.contains(&Notice::NoActiveShows));
}

// ===== Breaks =====

#[test]
fn frequency_one_puts_breaks_between_episodes_only() {
    let station = station(&["A", "B"], single(1, 5));
    let index = episodes(&[("A", 10), ("B", 10)]);
    let pool = clips(8, 30);

    let run = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(4),
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();

    assert_eq!(run.report.break_count, 3);
    assert_eq!(break_positions(&run.items), vec![1, 2, 3]);
    assert!(run.items.last().unwrap().is_episode());
    assert!(run
        .items
        .iter()
        .filter(|item| item.is_break())
        .all(|item| item.clips().len() == 1));
}

#[test]
fn frequency_two_breaks_every_other_episode() {
    let station = station(&["A"], single(2, 5));
    let index = episodes(&[("A", 10)]);
    let pool = clips(8, 30);

    let run = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(6),
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();
    assert_eq!(break_positions(&run.items), vec![2, 4]);
}

#[test]
fn no_break_after_the_last_available_episode() {
    let station = station(&["A"], single(1, 5));
    let index = episodes(&[("A", 2)]);
    let pool = clips(4, 30);

    let run = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(10),
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();
    assert_eq!(break_positions(&run.items), vec![1]);
}

#[test]
fn blocks_of_fifty_second_clips_stay_in_range() {
    let breaks = BreakConfig::Block {
        frequency: 1,
        min_gap: 3,
        duration: BlockDuration::from_secs(60, 120),
    };
    let station = station(&["A", "B"], breaks);
    let index = episodes(&[("A", 30), ("B", 30)]);
    let pool = clips(10, 50);

    let run = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(40),
            &mut StdRng::seed_from_u64(8),
        )
        .unwrap();

    assert_eq!(run.report.break_count, 39);
    for item in run.items.iter().filter(|item| item.is_break()) {
        let total = item.duration();
        assert!(total >= Duration::from_secs(50));
        assert!(total <= Duration::from_secs(120));
    }
}

#[test]
fn small_pool_reuses_least_recently_used_clip() {
    let station = station(&["A"], single(1, 10));
    let index = episodes(&[("A", 20)]);
    let pool = clips(3, 30);

    let run = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(8),
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();

    let aired: Vec<ClipId> = run
        .items
        .iter()
        .flat_map(|item| item.clips().iter().map(|clip| clip.id.clone()))
        .collect();
    assert_eq!(aired.len(), 7);

    // The first three are distinct; afterwards each pick repeats the clip
    // aired three breaks earlier.
    let first_three: std::collections::HashSet<_> = aired[..3].iter().collect();
    assert_eq!(first_three.len(), 3);
    for i in 3..aired.len() {
        assert_eq!(aired[i], aired[i - 3]);
    }
    assert_eq!(run.state.recent_clips.len(), 3);
}

#[test]
fn repeat_window_persists_across_runs() {
    let mut station = station(&["A"], single(1, 4));
    let index = episodes(&[("A", 30)]);
    let pool = clips(5, 30);

    let first = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(4),
            &mut StdRng::seed_from_u64(2),
        )
        .unwrap();
    let recent = first.state.recent_clips.clone();
    assert_eq!(recent.len(), 3);
    station.commit(first.state).unwrap();

    let second = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(2),
            &mut StdRng::seed_from_u64(2),
        )
        .unwrap();
    let next_clip = &second.items[1].clips()[0].id;
    assert!(!recent.contains(next_clip));
}

#[test]
fn empty_pool_is_reported_once() {
    let station = station(&["A", "B"], single(1, 5));
    let index = episodes(&[("A", 10), ("B", 10)]);
    let pool = ClipPool::empty();

    let run = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(6),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();

    assert_eq!(run.report.episodes, 6);
    assert_eq!(run.report.break_count, 0);
    let reported = run
        .report
        .notices
        .iter()
        .filter(|notice| **notice == Notice::NoClipsAvailable)
        .count();
    assert_eq!(reported, 1);
}

#[test]
fn disabled_breaks_leave_window_untouched() {
    let mut station = station(&["A"], single(1, 5));
    let index = episodes(&[("A", 10)]);
    let pool = clips(6, 30);

    let first = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(3),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
    let recent = first.state.recent_clips.clone();
    station.commit(first.state).unwrap();
    station
        .update_playlist("Real TV", |p| p.breaks = BreakConfig::Disabled)
        .unwrap();

    let second = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(3),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
    assert!(second.items.iter().all(PlaylistItem::is_episode));
    assert_eq!(second.state.recent_clips, recent);
}

#[test]
fn weighted_categories_favor_heavier_weight() {
    let station = station(&["A"], single(1, 0));
    let index = episodes(&[("A", 400)]);
    let mut library = BTreeMap::new();
    library.insert(
        "cereal".to_string(),
        vec![Clip::new("cereal-1", "cereal", Duration::from_secs(30))],
    );
    library.insert(
        "toys".to_string(),
        vec![Clip::new("toy-1", "toys", Duration::from_secs(30))],
    );
    let pool = ClipPool::new(
        library,
        &[Category::new("Cereal", 9.0), Category::new("Toys", 1.0)],
    )
    .unwrap();

    let run = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(400),
            &mut StdRng::seed_from_u64(42),
        )
        .unwrap();

    let cereal = run
        .items
        .iter()
        .flat_map(|item| item.clips())
        .filter(|clip| clip.category == "cereal")
        .count();
    assert!(cereal > 300, "cereal aired {cereal} of 399 breaks");
}

// ===== Report =====

#[test]
fn report_totals_runtime_and_positions() {
    let station = station(&["A", "B"], single(1, 5));
    let index = episodes(&[("A", 1), ("B", 5)]);
    let pool = clips(5, 30);

    let run = Generator::new(station.shows(), &index, &pool)
        .generate(
            &station.snapshot(None).unwrap(),
            GenerationRequest::new(3),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();

    let report = &run.report;
    assert_eq!(report.episodes, 3);
    assert_eq!(report.break_count, 2);
    assert_eq!(report.break_runtime, Duration::from_secs(60));
    assert_eq!(report.total_runtime, Duration::from_secs(3 * 22 * 60 + 60));

    let a = &report.shows[0];
    assert_eq!(a.episodes_added, 1);
    assert!(a.exhausted);
    let b = &report.shows[1];
    assert_eq!(b.episodes_added, 2);
    assert_eq!(b.position, "S01E03");
    assert!(report
        .notices
        .contains(&Notice::ShowExhausted { show: ShowId::new("A") }));
}
