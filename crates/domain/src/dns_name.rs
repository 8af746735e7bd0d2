/// Canonical form used for every name comparison and map key:
/// ASCII-lowercased, without the trailing root dot.
pub fn normalize_name(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// True for the root name `.`, which an SRV target uses to say "no service here".
pub fn is_root_name(name: &str) -> bool {
    name.trim_end_matches('.').is_empty()
}
