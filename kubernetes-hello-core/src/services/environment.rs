//! Process environment as display pairs

use crate::types::{NameValuePair, NameValuePairs};

/// Variables holding a path list; each element is shown on its own line.
const PATH_LIST_VARIABLES: [&str; 3] = ["PATH", "XDG_DATA_DIRS", "XDG_CONFIG_DIRS"];

/// Every variable of the current process, sorted by name.
///
/// Names and values that are not valid UTF-8 are converted lossily.
pub fn collect_environment() -> Vec<NameValuePair> {
    environment_pairs(std::env::vars_os().map(|(name, value)| {
        (
            name.to_string_lossy().into_owned(),
            value.to_string_lossy().into_owned(),
        )
    }))
}

pub fn environment_pairs<I>(vars: I) -> Vec<NameValuePair>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .map(|(name, value)| {
            let value = if PATH_LIST_VARIABLES.contains(&name.as_str()) {
                split_path_list(&value)
            } else {
                value
            };
            NameValuePair::new(name, value)
        })
        .collect::<NameValuePairs>()
        .sorted()
}

fn split_path_list(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    std::env::split_paths(value)
        .map(|path| path.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}
