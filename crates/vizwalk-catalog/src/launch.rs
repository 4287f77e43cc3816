//! Launch references for experiences, galleries and videos
//!
//! [`LaunchSessionBuilder`] decides how a record's experience is opened and
//! builds the destination reference. Every experience launch carries a fresh
//! session id so the viewer can tell concurrent sessions apart.
//!
//! # Launch selection
//! 1. Local executable path, privileged context with a launcher: run it
//! 2. Absolute `http(s)` URL: add `session` and `build`
//! 3. Any other non-blank reference: join against the app origin, same params
//! 4. Blank reference: synthetic experience route

use crate::config::CatalogConfig;
use crate::error::LaunchError;
use crate::path::{self, ExecutionContext};
use crate::record::ProjectRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use url::{form_urlencoded, Url};

static HTTP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^https?://").expect("static regex"));

/// Wall-clock source for session ids and cache busting
pub trait LaunchClock: Send + Sync + Debug {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// System clock that never repeats a millisecond
///
/// Two launches in the same millisecond get consecutive instants, which
/// keeps their session ids distinct.
#[derive(Debug, Default)]
pub struct SystemClock {
    last_millis: AtomicI64,
}

impl SystemClock {
    /// Create clock
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LaunchClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_millis();
        let mut prev = self.last_millis.load(Ordering::Acquire);
        loop {
            let next = wall.max(prev + 1);
            match self.last_millis.compare_exchange_weak(
                prev,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return DateTime::from_timestamp_millis(next).unwrap_or_else(Utc::now),
                Err(actual) => prev = actual,
            }
        }
    }
}

/// Where an experience launch goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    /// Local executable started by the host
    Executable {
        /// Path as stored
        path: String,
    },
    /// Absolute remote URL with session parameters
    RemoteUrl {
        /// Final URL
        url: String,
    },
    /// Stored relative reference resolved against the app origin
    RelativeUrl {
        /// Final URL
        url: String,
    },
    /// Internal experience route built from the record
    SyntheticUrl {
        /// Route with query
        url: String,
    },
}

impl LaunchTarget {
    /// Path or URL to open
    #[must_use]
    pub fn reference(&self) -> &str {
        match self {
            Self::Executable { path } => path,
            Self::RemoteUrl { url } | Self::RelativeUrl { url } | Self::SyntheticUrl { url } => url,
        }
    }

    /// Whether this target starts a local process
    #[inline]
    #[must_use]
    pub fn is_executable(&self) -> bool {
        matches!(self, Self::Executable { .. })
    }

    /// First value of a query parameter, if the target is a URL
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        if self.is_executable() {
            return None;
        }
        query_param(self.reference(), name)
    }

    /// Session id carried by the target
    #[inline]
    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        self.query_param("session")
    }
}

/// How a record's video is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoTarget {
    /// Raw reference handed to the host's media player
    ExternalPlayer {
        /// Reference as stored
        reference: String,
    },
    /// Resolved reference opened in a new browsing context
    Browser {
        /// Resolved URL or path
        url: String,
    },
}

/// Builds launch references for catalog records
#[derive(Debug, Clone)]
pub struct LaunchSessionBuilder {
    config: CatalogConfig,
    clock: Arc<dyn LaunchClock>,
}

impl LaunchSessionBuilder {
    /// Builder on the system clock
    #[must_use]
    pub fn new(config: CatalogConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Builder on a specific clock
    #[inline]
    #[must_use]
    pub fn with_clock(config: CatalogConfig, clock: Arc<dyn LaunchClock>) -> Self {
        Self { config, clock }
    }

    /// Fresh session id for `record`
    #[must_use]
    pub fn session_id(&self, record: &ProjectRecord) -> String {
        session_id(&record.project_name, self.clock.now())
    }

    /// Whether `reference` names a local executable
    #[must_use]
    pub fn is_executable_ref(&self, reference: &str) -> bool {
        self.config.is_executable_name(reference) && path::is_local_path(reference)
    }

    /// Destination for opening the record's experience
    ///
    /// Executable references only launch when `ctx` can start processes;
    /// otherwise they fall through to the URL cases as plain strings.
    ///
    /// # Errors
    /// Returns [`LaunchError::InvalidUrl`] when the stored reference or the
    /// configured origin cannot be parsed
    pub fn build_experience_launch(
        &self,
        record: &ProjectRecord,
        ctx: &ExecutionContext,
    ) -> Result<LaunchTarget, LaunchError> {
        let raw = record.launch_ref.trim();

        if self.is_executable_ref(raw) {
            if ctx.can_start_executables() {
                tracing::info!(path = raw, "launching local executable");
                return Ok(LaunchTarget::Executable {
                    path: raw.to_string(),
                });
            }
            tracing::debug!(path = raw, "executable launch unavailable; using reference as url");
        }

        let now = self.clock.now();
        let session = session_id(&record.project_name, now);
        let build = record.build_label(&self.config.fallback_build_label);
        let params = [("session", session.as_str()), ("build", build)];

        let target = if raw.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("project", &project_slug(&record.project_name))
                .append_pair("s", &now.timestamp_millis().to_string())
                .append_pair("session", &session)
                .append_pair("build", build)
                .finish();
            LaunchTarget::SyntheticUrl {
                url: format!("{}?{query}", self.config.experience_route),
            }
        } else if HTTP_RE.is_match(raw) {
            let mut url = parse_url(raw, None)?;
            set_query_params(&mut url, &params);
            LaunchTarget::RemoteUrl { url: url.into() }
        } else {
            let base = parse_url(&self.config.app_origin, None)?;
            let mut url = parse_url(raw, Some(&base))?;
            set_query_params(&mut url, &params);
            LaunchTarget::RelativeUrl { url: url.into() }
        };

        tracing::debug!(session = %session, target = target.reference(), "experience launch built");
        Ok(target)
    }

    /// Gallery route for the record; no session id
    #[must_use]
    pub fn build_gallery_launch(&self, record: &ProjectRecord) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("build", record.build_label(&self.config.fallback_build_label))
            .finish();
        format!("{}?{query}", self.config.gallery_route)
    }

    /// How to open the record's video, if it has one
    #[must_use]
    pub fn build_video_launch(
        &self,
        record: &ProjectRecord,
        ctx: &ExecutionContext,
    ) -> Option<VideoTarget> {
        let raw = record.video_ref.trim();
        if raw.is_empty() {
            return None;
        }
        if ctx.privileged && ctx.can_open_media_player {
            return Some(VideoTarget::ExternalPlayer {
                reference: raw.to_string(),
            });
        }
        Some(VideoTarget::Browser {
            url: path::resolve(raw, ctx),
        })
    }

    /// Link to the record in the third-party viewer
    #[must_use]
    pub fn external_viewer_link(&self, record: &ProjectRecord) -> Option<String> {
        let id = record.external_viewer_id.trim();
        if id.is_empty() {
            return None;
        }
        let mut url = match Url::parse(&self.config.viewer_base_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "viewer base url is invalid");
                return None;
            }
        };
        url.path_segments_mut().ok()?.pop_if_empty().push(id);
        url.set_fragment(Some("Project#Summary"));
        Some(url.into())
    }
}

/// Lower-case slug: non-alphanumeric runs become one hyphen, edges trimmed
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Slug of the project name, `project` when that is empty
#[must_use]
pub fn project_slug(project_name: &str) -> String {
    let slug = slugify(project_name);
    if slug.is_empty() {
        "project".to_string()
    } else {
        slug
    }
}

/// Session id: project slug, then the ISO-8601 instant with `:` and `.` as `-`
#[must_use]
pub fn session_id(project_name: &str, at: DateTime<Utc>) -> String {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{}-{stamp}", project_slug(project_name))
}

fn parse_url(reference: &str, base: Option<&Url>) -> Result<Url, LaunchError> {
    let parsed = match base {
        Some(base) => base.join(reference),
        None => Url::parse(reference),
    };
    parsed.map_err(|source| LaunchError::InvalidUrl {
        reference: reference.to_string(),
        source,
    })
}

/// Set query parameters in place, replacing the first occurrence of each
/// name and dropping later duplicates; other pairs keep their order
fn set_query_params(url: &mut Url, params: &[(&str, &str)]) {
    let existing: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let mut placed = HashSet::new();
    let mut pairs: Vec<(String, String)> = Vec::with_capacity(existing.len() + params.len());

    for (name, value) in existing {
        match params.iter().find(|(n, _)| *n == name) {
            Some((n, v)) => {
                if placed.insert(*n) {
                    pairs.push((name, (*v).to_string()));
                }
            }
            None => pairs.push((name, value)),
        }
    }
    for (name, value) in params {
        if !placed.contains(name) {
            pairs.push(((*name).to_string(), (*value).to_string()));
        }
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
}

fn query_param(reference: &str, name: &str) -> Option<String> {
    let (_, query) = reference.split_once('?')?;
    let query = query.split_once('#').map_or(query, |(q, _)| q);
    form_urlencoded::parse(query.as_bytes())
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.into_owned())
}
