use super::{CandidateSnapshot, RankingPolicy, TieBreak};
use crate::{interfaces::ModuleInspector, types::SearchName};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Orders candidate files by how well they fit a search name
#[derive(Debug, Clone, Default)]
pub struct FuzzyRanker {
    policy: RankingPolicy,
}

impl FuzzyRanker {
    pub fn new(policy: RankingPolicy) -> Self {
        Self { policy }
    }

    /// Rank candidates, best first.
    ///
    /// Header metadata is only read for candidates that share their file name
    /// with another candidate, since only those ever reach the tie-break chain.
    pub fn rank(
        &self,
        candidates: Vec<PathBuf>,
        search: &SearchName,
        inspector: &dyn ModuleInspector,
        trusted_root: Option<&Path>,
    ) -> Vec<CandidateSnapshot> {
        let mut snapshots: Vec<CandidateSnapshot> = candidates
            .into_iter()
            .enumerate()
            .map(|(order, path)| CandidateSnapshot::capture(path, order, search, trusted_root))
            .collect();

        let mut groups: HashMap<String, (usize, usize)> = HashMap::new();
        for snapshot in &snapshots {
            let entry = groups.entry(snapshot.stem_key()).or_insert((snapshot.order, 0));
            entry.1 += 1;
        }

        for snapshot in &mut snapshots {
            let (group, size) = groups[&snapshot.stem_key()];
            snapshot.group = group;
            if size > 1 {
                snapshot.capture_metadata(search, inspector);
            }
        }

        snapshots.sort_by(|a, b| compare_candidates(&self.policy, a, b));

        if tracing::enabled!(tracing::Level::TRACE) {
            for (rank, snapshot) in snapshots.iter().enumerate() {
                tracing::trace!("#{} {}", rank, snapshot.path.display());
            }
        }

        snapshots
    }
}

/// Total order over candidate snapshots, best first.
///
/// 1. existing files first
/// 2. stems containing the search name first
/// 3. stems equal to the search name first
/// 4. earlier occurrence of the search name first
/// 5. same-stem candidates stay together and go through the tie-break chain
/// 6. input order
pub fn compare_candidates(policy: &RankingPolicy, a: &CandidateSnapshot, b: &CandidateSnapshot) -> Ordering {
    b.exists
        .cmp(&a.exists)
        .then_with(|| a.match_index.is_none().cmp(&b.match_index.is_none()))
        .then_with(|| b.exact_stem.cmp(&a.exact_stem))
        .then_with(|| a.match_index.cmp(&b.match_index))
        .then_with(|| a.group.cmp(&b.group))
        .then_with(|| tie_break(policy, a, b))
        .then_with(|| a.order.cmp(&b.order))
}

fn tie_break(policy: &RankingPolicy, a: &CandidateSnapshot, b: &CandidateSnapshot) -> Ordering {
    for rule in policy.tie_breaks() {
        // Missing values sort as lowest, so an unreadable candidate loses
        let ordering = match rule {
            TieBreak::ExactName => b.exact_header.cmp(&a.exact_header),
            TieBreak::Version => b.version.cmp(&a.version),
            TieBreak::TrustedRoot => b.trusted.cmp(&a.trusted),
            TieBreak::Recency => b.modified.cmp(&a.modified),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
