use teambuilder_core::{
    Character, CharacterType, FilterCriteria, Roster, SortKey, SortOrder, StatBlock, StatKind,
    apply_filters, decode_team_code, encode_team_code,
};

const SETS: [&str; 3] = ["Set 1", "Set 2", "Set 29"];
const GROUPS: [&str; 3] = ["Avengers", "X-Men", "Bat Family"];

/// Deterministic roster covering every stat value 0..=3 across sets and groups.
fn roster() -> Roster {
    let characters = (0..48_u32)
        .map(|n| Character {
            id: format!("hero-{n}"),
            name: format!("HERO {}", 47 - n),
            variant: None,
            kind: if n % 5 == 0 {
                CharacterType::DualModeAntiHero
            } else {
                CharacterType::Hero
            },
            set: (n % 4 != 3).then(|| SETS[(n % 3) as usize].to_string()),
            groups: GROUPS
                .iter()
                .enumerate()
                .filter(|(i, _)| (n >> i) & 1 == 1)
                .map(|(_, g)| (*g).to_string())
                .collect(),
            image_url: String::new(),
            stats: StatBlock::new(n % 4, (n / 4) % 4, (n / 3) % 4, (n * 7) % 4),
        })
        .collect();
    Roster::new(characters)
}

fn criteria_grid() -> Vec<FilterCriteria> {
    let mut grid = Vec::new();
    for kind in StatKind::ALL {
        for min in 0..=4 {
            grid.push(FilterCriteria::default().with_min_stat(kind, min));
        }
    }
    for set in SETS {
        grid.push(FilterCriteria::default().with_set(set));
        for group in GROUPS {
            grid.push(
                FilterCriteria::default()
                    .with_set(set)
                    .with_group(group.to_lowercase())
                    .with_min_stat(StatKind::Attack, 1),
            );
        }
    }
    grid.push(
        FilterCriteria::default()
            .with_group("avengers")
            .with_group("x-men"),
    );
    grid
}

#[test]
fn every_included_character_satisfies_every_criterion() {
    let roster = roster();
    for criteria in criteria_grid() {
        for character in apply_filters(&roster, &criteria) {
            for kind in StatKind::ALL {
                assert!(character.stat(kind) >= criteria.min_stat(kind));
            }
            if let Some(set) = &criteria.set {
                assert_eq!(character.set.as_ref(), Some(set));
            }
            if !criteria.groups.is_empty() {
                assert!(criteria.groups.iter().any(|g| character.in_group(g)));
            }
        }
    }
}

#[test]
fn removing_a_criterion_never_shrinks_the_result() {
    let roster = roster();
    for criteria in criteria_grid() {
        let narrow = apply_filters(&roster, &criteria).len();
        let mut relaxed = criteria.clone();
        relaxed.set = None;
        assert!(apply_filters(&roster, &relaxed).len() >= narrow);
        relaxed.groups.clear();
        assert!(apply_filters(&roster, &relaxed).len() >= narrow);
        relaxed.min_stats = [0; 4];
        assert_eq!(apply_filters(&roster, &relaxed).len(), roster.len());
    }
}

#[test]
fn sorting_only_reorders() {
    let roster = roster();
    let base = FilterCriteria::default().with_min_stat(StatKind::Wild, 1);
    let unsorted: Vec<&str> = apply_filters(&roster, &base)
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    let keys = [
        SortKey::None,
        SortKey::Alphabetical,
        SortKey::Stat(StatKind::Heroic),
        SortKey::Stat(StatKind::Movement),
    ];
    for sort in keys {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let criteria = base.clone().with_sort(sort, order);
            let view = apply_filters(&roster, &criteria);
            let mut ids: Vec<&str> = view.iter().map(|c| c.id.as_str()).collect();
            ids.sort_unstable();
            let mut expected = unsorted.clone();
            expected.sort_unstable();
            assert_eq!(ids, expected);

            if let SortKey::Stat(kind) = sort {
                let values: Vec<u32> = view.iter().map(|c| c.stat(kind)).collect();
                let monotone = values.windows(2).all(|w| match order {
                    SortOrder::Asc => w[0] <= w[1],
                    SortOrder::Desc => w[0] >= w[1],
                });
                assert!(monotone, "{sort:?} {order:?}");
            }
        }
    }
}

#[test]
fn team_codes_round_trip_for_roster_ids() {
    let roster = roster();
    let ids: Vec<String> = roster.iter().map(|c| c.id.clone()).collect();
    for len in 0..ids.len() {
        let team = &ids[..len];
        assert_eq!(decode_team_code(&encode_team_code(team).unwrap()).unwrap(), team);
    }
}

#[test]
fn decoding_noise_never_panics() {
    let mut seed = 0x2545_f491_u32;
    for _ in 0..512 {
        let len = (seed % 24) as usize;
        let noise: String = (0..len)
            .map(|_| {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                char::from_u32(32 + seed % 95).unwrap_or('?')
            })
            .collect();
        let _ = decode_team_code(&noise);
    }
}
