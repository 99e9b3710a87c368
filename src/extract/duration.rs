/// Spells out an ISO-8601 style `PT..H..M..S` token.
///
/// This is a textual substitution of the first `PT`, `H`, `M` and `S`;
/// no unit conversion happens, so `PT90M` stays `"90 minutes"`.
/// Day or larger components are passed through untouched.
pub fn parse_duration(token: &str) -> String {
    token
        .replacen("PT", "", 1)
        .replacen('H', " hours ", 1)
        .replacen('M', " minutes ", 1)
        .replacen('S', " seconds", 1)
        .trim()
        .to_string()
}
