/// Download name for a final variant: `{job_id}_final_{A|B}.md`.
///
/// Characters that are not allowed in file names on common platforms are
/// replaced with `_` so a hostile job id cannot escape the export directory.
pub fn variant_filename(job_id: &str, variant: &str) -> String {
    let mut stem: String = job_id
        .trim()
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    stem = stem.trim_matches('.').to_string();
    if stem.is_empty() {
        stem = "job".to_string();
    }
    format!("{stem}_final_{variant}.md")
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
