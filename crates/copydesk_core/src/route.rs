use percent_encoding::percent_decode_str;
use url::Url;

use crate::JobId;

const ORIGIN: &str = "copydesk://wizard/";

/// Wizard location. Handoff state travels in the location itself:
/// the title in the query string, the job id as a path parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/` with an optional `?title=` prefill.
    Titles { title: Option<String> },
    /// `/structure?title=…`
    Structure { title: String },
    /// `/result/{job_id}`
    Result { job_id: JobId },
}

impl Default for Route {
    fn default() -> Self {
        Route::Titles { title: None }
    }
}

impl Route {
    pub fn home() -> Self {
        Self::default()
    }

    pub fn structure(title: impl Into<String>) -> Self {
        Route::Structure {
            title: title.into(),
        }
    }

    pub fn result(job_id: impl Into<JobId>) -> Self {
        Route::Result {
            job_id: job_id.into(),
        }
    }

    /// Parses a location such as `/structure?title=a%20b`. Unknown paths yield `None`.
    pub fn parse(location: &str) -> Option<Route> {
        let url = Url::parse(ORIGIN).ok()?.join(location).ok()?;
        let segments: Vec<String> = url
            .path_segments()?
            .filter(|s| !s.is_empty())
            .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
            .collect();
        let title = url
            .query_pairs()
            .find(|(k, _)| k == "title")
            .map(|(_, v)| v.into_owned());

        match segments.as_slice() {
            [] => Some(Route::Titles {
                title: title.filter(|t| !t.is_empty()),
            }),
            [first] if first == "structure" => Some(Route::Structure {
                title: title.unwrap_or_default(),
            }),
            [first, job_id] if first == "result" && !job_id.is_empty() => Some(Route::Result {
                job_id: job_id.clone(),
            }),
            _ => None,
        }
    }

    /// Renders the location back into path-and-query form.
    pub fn to_location(&self) -> String {
        let Ok(mut url) = Url::parse(ORIGIN) else {
            return "/".to_string();
        };
        match self {
            Route::Titles { title } => {
                if let Some(title) = title {
                    url.query_pairs_mut().append_pair("title", title);
                }
            }
            Route::Structure { title } => {
                url.set_path("/structure");
                url.query_pairs_mut().append_pair("title", title);
            }
            Route::Result { job_id } => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.clear().push("result").push(job_id);
                }
            }
        }
        match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        }
    }

    pub fn job_id(&self) -> Option<&str> {
        match self {
            Route::Result { job_id } => Some(job_id),
            _ => None,
        }
    }
}
