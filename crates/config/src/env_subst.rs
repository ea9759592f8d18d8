/// Expand `${NAME}` and `${NAME:-fallback}` placeholders in raw config text.
///
/// A variable that is unset and has no fallback keeps its placeholder, so a
/// later parse error points at the offending key. An unterminated `${` is
/// copied through verbatim.
pub fn substitute_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let body = &after[..end];
        out.push_str(&expand(body));
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

fn expand(body: &str) -> String {
    let (name, fallback) = match body.split_once(":-") {
        Some((name, fallback)) => (name, Some(fallback)),
        None => (body, None),
    };
    if name.is_empty() {
        return format!("${{{body}}}");
    }
    match (std::env::var(name), fallback) {
        (Ok(val), _) => val,
        (Err(_), Some(fallback)) => fallback.to_string(),
        (Err(_), None) => format!("${{{body}}}"),
    }
}
