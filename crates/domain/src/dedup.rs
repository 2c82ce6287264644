use crate::activity::RawActivity;
use itertools::Itertools;
use std::collections::HashSet;

/// Collapses extracted activities that resolve to the same time of day.
///
/// Within a `(hour, minute)` group the winner is the entry with a PM hour,
/// then the one with the longer description. A final pass drops any
/// remaining AM entry whose PM counterpart (same minute, hour + 12) is also
/// present: diet plans rarely schedule the same clock position both in the
/// morning and in the evening, the double usually comes from two matchers
/// reading one ambiguous token differently.
pub fn deduplicate_activities(activities: Vec<RawActivity>) -> Vec<RawActivity> {
    let winners = activities
        .into_iter()
        .into_group_map_by(|a| (a.hour, a.minute))
        .into_iter()
        .filter_map(|(_, group)| {
            group
                .into_iter()
                .max_by_key(|a| (a.hour >= 12, a.text.len()))
        })
        .collect::<Vec<_>>();

    let pm_slots = winners
        .iter()
        .filter(|a| a.hour >= 12)
        .map(|a| (a.hour, a.minute))
        .collect::<HashSet<_>>();

    winners
        .into_iter()
        .filter(|a| a.hour >= 12 || !pm_slots.contains(&(a.hour + 12, a.minute)))
        .sorted_by_key(|a| (a.hour, a.minute))
        .collect()
}
