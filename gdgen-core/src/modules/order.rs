//! Dependency ordering of the enabled module list

use std::collections::{BTreeMap, HashSet, VecDeque};

use tracing::warn;

use crate::env::ModuleDependencies;

/// Order `names` so every module comes after the dependencies it declares
/// that are part of the list. Modules are taken from the back of the list
/// and rotated to the front while a dependency is still pending.
///
/// A dependency cycle is reported and the remaining modules are appended
/// as they are.
pub fn sort_module_list(
    names: &[String],
    dependencies: &BTreeMap<String, ModuleDependencies>,
) -> Vec<String> {
    let present: HashSet<&str> = names.iter().map(String::as_str).collect();

    let mut frontier: VecDeque<&str> = names.iter().map(String::as_str).collect();
    let mut explored: Vec<&str> = Vec::with_capacity(names.len());
    let mut seen: HashSet<&str> = HashSet::new();
    let mut stalled = 0;

    while let Some(current) = frontier.pop_back() {
        if deps_of(current, dependencies, &present).iter().any(|dep| !seen.contains(dep)) {
            frontier.push_front(current);
            stalled += 1;
            if stalled >= frontier.len() {
                warn!("Module dependency cycle among: {:?}", frontier);
                while let Some(rest) = frontier.pop_back() {
                    explored.push(rest);
                }
            }
            continue;
        }

        stalled = 0;
        seen.insert(current);
        explored.push(current);
    }

    explored.into_iter().map(str::to_string).collect()
}

fn deps_of<'a>(
    module: &str,
    dependencies: &'a BTreeMap<String, ModuleDependencies>,
    present: &HashSet<&str>,
) -> Vec<&'a str> {
    dependencies
        .get(module)
        .map(|d| {
            d.required
                .iter()
                .chain(d.optional.iter())
                .map(String::as_str)
                .filter(|dep| *dep != module && present.contains(dep))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn deps(entries: &[(&str, &[&str], &[&str])]) -> BTreeMap<String, ModuleDependencies> {
        entries
            .iter()
            .map(|(name, required, optional)| {
                (
                    name.to_string(),
                    ModuleDependencies {
                        required: names(required),
                        optional: names(optional),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_no_dependencies_takes_from_the_back() {
        let sorted = sort_module_list(&names(&["a", "b", "c"]), &BTreeMap::new());
        assert_eq!(sorted, names(&["c", "b", "a"]));
    }

    #[test]
    fn test_dependency_comes_first() {
        let sorted = sort_module_list(&names(&["a", "b", "c"]), &deps(&[("c", &["a"], &[])]));
        assert_eq!(sorted, names(&["b", "a", "c"]));
    }

    #[test]
    fn test_missing_optional_dependency_is_ignored() {
        let sorted =
            sort_module_list(&names(&["gltf", "svg"]), &deps(&[("gltf", &[], &["fbx", "svg"])]));
        assert_eq!(sorted, names(&["svg", "gltf"]));
    }

    #[test]
    fn test_cycle_terminates() {
        let sorted = sort_module_list(
            &names(&["a", "b", "c"]),
            &deps(&[("a", &["b"], &[]), ("b", &["a"], &[])]),
        );
        assert_eq!(sorted.len(), 3);
        assert_eq!(sorted[0], "c");
    }
}
