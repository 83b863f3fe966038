//! Pairwise conflict analysis across a policy set, plus the optional
//! coverage-gap pass against externally supplied directory groups.

use crate::model::Policy;
use caguard_types::{Conflict, ConflictKind};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use std::borrow::Borrow;
use std::collections::BTreeSet;

/// Default coverage-gap denylist: service, sync and emergency-access groups.
pub const DEFAULT_SYSTEM_GROUP_PATTERNS: &[&str] = &[
    "Service-*",
    "System-*",
    "Sync-*",
    "*BreakGlass*",
    "*Emergency*",
    "*AAD-Device*",
];

fn set_of(items: &[String]) -> BTreeSet<&str> {
    items.iter().map(String::as_str).collect()
}

fn controls(p: &Policy) -> BTreeSet<&str> {
    set_of(&p.grant_controls.built_in_controls)
}

/// Shared included group or user, or either side targets all users.
pub fn overlaps(p1: &Policy, p2: &Policy) -> bool {
    let (u1, u2) = (&p1.conditions.users, &p2.conditions.users);
    if u1.includes_all_users() || u2.includes_all_users() {
        return true;
    }
    let groups = set_of(&u1.include_groups);
    if u2.include_groups.iter().any(|g| groups.contains(g.as_str())) {
        return true;
    }
    let users = set_of(&u1.include_users);
    u2.include_users.iter().any(|u| users.contains(u.as_str()))
}

/// Set-equal targeting, exclusions, applications and grant controls.
pub fn identical(p1: &Policy, p2: &Policy) -> bool {
    let (u1, u2) = (&p1.conditions.users, &p2.conditions.users);
    set_of(&u1.include_groups) == set_of(&u2.include_groups)
        && set_of(&u1.exclude_groups) == set_of(&u2.exclude_groups)
        && set_of(&u1.include_users) == set_of(&u2.include_users)
        && set_of(&p1.conditions.applications.include)
            == set_of(&p2.conditions.applications.include)
        && controls(p1) == controls(p2)
}

/// At most one conflict per pair. Redundancy needs equal controls and the
/// overlap conflict needs unequal ones, so the two never coincide.
fn analyze_pair(p1: &Policy, p2: &Policy) -> Option<Conflict> {
    let (c1, c2) = (controls(p1), controls(p2));
    if c1 != c2 {
        if !overlaps(p1, p2) {
            return None;
        }
        return Some(Conflict {
            kind: ConflictKind::OverlappingConditions,
            severity: ConflictKind::OverlappingConditions.severity(),
            description: format!(
                "policies target overlapping users but grant different controls: {} vs {}",
                fmt_set(&c1),
                fmt_set(&c2)
            ),
            policies: vec![p1.name.clone(), p2.name.clone()],
            groups: Vec::new(),
        });
    }
    if identical(p1, p2) {
        return Some(Conflict {
            kind: ConflictKind::RedundantPolicy,
            severity: ConflictKind::RedundantPolicy.severity(),
            description: "policies have identical conditions and controls".to_string(),
            policies: vec![p1.name.clone(), p2.name.clone()],
            groups: Vec::new(),
        });
    }
    None
}

fn fmt_set(set: &BTreeSet<&str>) -> String {
    let items: Vec<&str> = set.iter().copied().collect();
    format!("{{{}}}", items.join(", "))
}

/// Sequential scan over unordered pairs `(i < j)`. Pairs are visited in input
/// order but the result is sorted with [`sort_conflicts`], so it does not
/// follow pair order.
pub fn detect<P: Borrow<Policy>>(policies: &[P]) -> Vec<Conflict> {
    let mut out = Vec::new();
    for (i, p1) in policies.iter().enumerate() {
        for p2 in &policies[i + 1..] {
            if let Some(c) = analyze_pair(p1.borrow(), p2.borrow()) {
                out.push(c);
            }
        }
    }
    sort_conflicts(&mut out);
    out
}

/// Same result as [`detect`], with the outer index partitioned across rayon
/// workers. Per-row results are concatenated in row order before sorting.
pub fn detect_parallel<P: Borrow<Policy> + Sync>(policies: &[P]) -> Vec<Conflict> {
    let mut out: Vec<Conflict> = (0..policies.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let p1 = policies[i].borrow();
            policies[i + 1..]
                .iter()
                .filter_map(move |p2| analyze_pair(p1, p2.borrow()))
        })
        .collect();
    sort_conflicts(&mut out);
    out
}

/// Stable sort by `(kind, sorted(policies))`.
pub fn sort_conflicts(conflicts: &mut [Conflict]) {
    conflicts.sort_by_cached_key(|c| {
        let mut names = c.policies.clone();
        names.sort();
        (c.kind, names)
    });
}

/// Glob denylist for groups that never need policy coverage.
#[derive(Clone, Debug)]
pub struct SystemGroupFilter {
    set: GlobSet,
}

impl SystemGroupFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, globset::Error> {
        let mut builder = GlobSetBuilder::new();
        for p in patterns {
            builder.add(Glob::new(p.as_ref())?);
        }
        Ok(Self {
            set: builder.build()?,
        })
    }

    pub fn is_system_group(&self, group: &str) -> bool {
        self.set.is_match(group)
    }
}

impl Default for SystemGroupFilter {
    fn default() -> Self {
        let mut builder = GlobSetBuilder::new();
        for p in DEFAULT_SYSTEM_GROUP_PATTERNS {
            if let Ok(glob) = Glob::new(p) {
                builder.add(glob);
            }
        }
        Self {
            set: builder.build().unwrap_or_else(|_| GlobSet::empty()),
        }
    }
}

/// One conflict listing every known group no policy includes, minus system
/// groups. Groups are reported in input order, deduplicated.
pub fn detect_coverage_gaps<P: Borrow<Policy>>(
    policies: &[P],
    all_groups: &[String],
    filter: &SystemGroupFilter,
) -> Option<Conflict> {
    let covered: BTreeSet<&str> = policies
        .iter()
        .flat_map(|p| p.borrow().conditions.users.include_groups.iter())
        .map(String::as_str)
        .collect();

    let mut seen = BTreeSet::new();
    let uncovered: Vec<String> = all_groups
        .iter()
        .filter(|g| !covered.contains(g.as_str()) && !filter.is_system_group(g))
        .filter(|g| seen.insert(g.as_str()))
        .cloned()
        .collect();

    if uncovered.is_empty() {
        return None;
    }
    Some(Conflict {
        kind: ConflictKind::CoverageGap,
        severity: ConflictKind::CoverageGap.severity(),
        description: format!("groups without policy coverage: {}", uncovered.join(", ")),
        policies: Vec::new(),
        groups: uncovered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{BREAK_GLASS, policy};
    use caguard_types::Severity;

    #[test]
    fn shared_group_with_divergent_controls_is_one_overlap() {
        let a = policy("a").include_groups(&["G1"]).controls(&["mfa"]).build();
        let b = policy("b")
            .include_groups(&["G1"])
            .controls(&["compliantDevice"])
            .build();
        let out = detect(&[a, b]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, ConflictKind::OverlappingConditions);
        assert_eq!(out[0].severity, Severity::High);
        assert_eq!(out[0].policies, vec!["a", "b"]);
        assert!(out[0].description.contains("{mfa} vs {compliantDevice}"));
    }

    #[test]
    fn identical_policies_are_redundant_not_overlapping() {
        let a = policy("a")
            .include_groups(&["G1"])
            .exclude_groups(&[BREAK_GLASS])
            .controls(&["mfa"])
            .build();
        let b = policy("b")
            .include_groups(&["G1"])
            .exclude_groups(&[BREAK_GLASS])
            .controls(&["mfa"])
            .build();
        let out = detect(&[a, b]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, ConflictKind::RedundantPolicy);
        assert_eq!(out[0].severity, Severity::Medium);
    }

    #[test]
    fn all_users_overlaps_everything() {
        let a = policy("a").include_users(&["All"]).controls(&["mfa"]).build();
        let b = policy("b").include_groups(&["G9"]).controls(&["block"]).build();
        assert!(overlaps(&a, &b));
        assert_eq!(detect(&[a, b]).len(), 1);
    }

    #[test]
    fn disjoint_targets_do_not_conflict() {
        let a = policy("a").include_groups(&["G1"]).controls(&["mfa"]).build();
        let b = policy("b").include_groups(&["G2"]).controls(&["block"]).build();
        assert!(detect(&[a, b]).is_empty());
    }

    #[test]
    fn same_controls_different_apps_is_not_redundant() {
        let a = policy("a").include_groups(&["G1"]).controls(&["mfa"]).build();
        let b = policy("b")
            .include_groups(&["G1"])
            .include_apps(&["Office365"])
            .controls(&["mfa"])
            .build();
        assert!(!identical(&a, &b));
        assert!(detect(&[a, b]).is_empty());
    }

    #[test]
    fn control_order_does_not_matter() {
        let a = policy("a").include_groups(&["G1"]).controls(&["mfa", "compliantDevice"]).build();
        let b = policy("b").include_groups(&["G1"]).controls(&["compliantDevice", "mfa"]).build();
        let out = detect(&[a, b]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, ConflictKind::RedundantPolicy);
    }

    #[test]
    fn conflicts_sorted_by_kind_then_names() {
        let c = policy("c").include_groups(&["G1"]).controls(&["mfa"]).build();
        let b = policy("b").include_groups(&["G1"]).controls(&["mfa"]).build();
        let a = policy("a").include_groups(&["G1"]).controls(&["block"]).build();
        let out = detect(&[c, b, a]);
        let summary: Vec<_> = out.iter().map(|c| (c.kind, c.policies.clone())).collect();
        assert_eq!(
            summary,
            vec![
                (ConflictKind::OverlappingConditions, vec!["b".to_string(), "a".to_string()]),
                (ConflictKind::OverlappingConditions, vec!["c".to_string(), "a".to_string()]),
                (ConflictKind::RedundantPolicy, vec!["c".to_string(), "b".to_string()]),
            ]
        );
    }

    #[test]
    fn parallel_scan_matches_sequential() {
        let policies: Vec<Policy> = (0..40)
            .map(|i| {
                let group = format!("G{}", i % 5);
                let control = if i % 3 == 0 { "mfa" } else { "block" };
                policy(&format!("p{i:02}"))
                    .include_groups(&[group.as_str()])
                    .controls(&[control])
                    .build()
            })
            .collect();
        assert_eq!(detect(&policies), detect_parallel(&policies));
    }

    #[test]
    fn detect_accepts_borrowed_policies() {
        let a = policy("a").include_groups(&["G1"]).controls(&["mfa"]).build();
        let b = policy("b").include_groups(&["G1"]).build();
        let refs: Vec<&Policy> = vec![&a, &b];
        assert_eq!(detect(&refs).len(), 1);
    }

    #[test]
    fn coverage_gap_lists_uncovered_non_system_groups() {
        let a = policy("a").include_groups(&["Finance"]).build();
        let groups: Vec<String> = [
            "Finance",
            "HR",
            "Service-Backup",
            "Ops-BreakGlass",
            "Legal",
            "HR",
            "AAD-Device-Admins",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let gap = detect_coverage_gaps(&[a], &groups, &SystemGroupFilter::default())
            .expect("gap");
        assert_eq!(gap.kind, ConflictKind::CoverageGap);
        assert_eq!(gap.groups, vec!["HR", "Legal"]);
        assert!(gap.policies.is_empty());
        assert_eq!(gap.description, "groups without policy coverage: HR, Legal");
    }

    #[test]
    fn full_coverage_has_no_gap() {
        let a = policy("a").include_groups(&["Finance", "HR"]).build();
        let groups = vec!["HR".to_string(), "Sync-Connector".to_string()];
        assert!(detect_coverage_gaps(&[a], &groups, &SystemGroupFilter::default()).is_none());
    }

    #[test]
    fn custom_filter_patterns() {
        let filter = SystemGroupFilter::new(&["Lab-*"]).expect("valid globs");
        assert!(filter.is_system_group("Lab-01"));
        assert!(!filter.is_system_group("Service-Backup"));
        assert!(SystemGroupFilter::new(&["[unclosed"]).is_err());
    }
}
