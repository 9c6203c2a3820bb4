//! Declarative endpoint table.
//!
//! Each inbound route is described by an [`EndpointSpec`]: either a feed
//! projected from the aggregate snapshot, or a pass-through to one upstream
//! path. Specs are plain data (deserializable from settings) and are compiled
//! into an [`EndpointTable`] once at startup.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::aggregate::Feed;
use crate::error::{PitchsideError, Result};
use crate::request::{UpstreamMethod, UpstreamRequest};
use crate::template::PathTemplate;

/// Inbound parameters: path parameters merged over query parameters.
pub type Params = HashMap<String, String>;

/// Copies one inbound parameter into an outbound query or form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamBinding {
    /// Outbound field name.
    pub name: String,
    /// Inbound parameter name, when it differs from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    /// Reject the request when the parameter is absent or blank.
    #[serde(default)]
    pub required: bool,
}

impl ParamBinding {
    /// An optional binding with identical inbound and outbound names.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param: None,
            required: false,
        }
    }

    /// A required binding with identical inbound and outbound names.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            required: true,
            ..Self::optional(name)
        }
    }

    /// Reads the inbound parameter under a different name.
    pub fn from_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    fn source(&self) -> &str {
        self.param.as_deref().unwrap_or(&self.name)
    }

    fn resolve(&self, params: &Params) -> Result<Option<(String, String)>> {
        let value = params
            .get(self.source())
            .map(|v| v.trim())
            .filter(|v| !v.is_empty());

        match value {
            Some(value) => Ok(Some((self.name.clone(), value.to_string()))),
            None if self.required => Err(PitchsideError::missing_parameter(self.source())),
            None => Ok(None),
        }
    }
}

/// What an endpoint is served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum EndpointTarget {
    /// A feed projected from the cached aggregate snapshot.
    Aggregate { feed: Feed },
    /// A single upstream request, not cached.
    Upstream {
        path: String,
        #[serde(default)]
        method: UpstreamMethod,
        #[serde(default)]
        query: Vec<ParamBinding>,
        #[serde(default)]
        form: Vec<ParamBinding>,
    },
}

/// One row of the endpoint table, as written in settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSpec {
    /// Logical resource name, used in logs and metrics.
    pub name: String,
    /// Inbound route, in axum syntax (`/matches/{match_id}/info`).
    pub route: String,
    /// Where the response comes from.
    pub target: EndpointTarget,
}

impl EndpointSpec {
    /// An endpoint served from the aggregate snapshot.
    pub fn aggregate(name: &str, route: &str, feed: Feed) -> Self {
        Self {
            name: name.to_string(),
            route: route.to_string(),
            target: EndpointTarget::Aggregate { feed },
        }
    }

    /// A GET pass-through endpoint.
    pub fn upstream(name: &str, route: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            route: route.to_string(),
            target: EndpointTarget::Upstream {
                path: path.to_string(),
                method: UpstreamMethod::Get,
                query: Vec::new(),
                form: Vec::new(),
            },
        }
    }

    /// Switches a pass-through endpoint to a form POST.
    pub fn post_form(mut self) -> Self {
        if let EndpointTarget::Upstream { method, .. } = &mut self.target {
            *method = UpstreamMethod::PostForm;
        }
        self
    }

    /// Adds a query binding to a pass-through endpoint.
    pub fn query(mut self, binding: ParamBinding) -> Self {
        if let EndpointTarget::Upstream { query, .. } = &mut self.target {
            query.push(binding);
        }
        self
    }

    /// Adds a form binding to a pass-through endpoint.
    pub fn form(mut self, binding: ParamBinding) -> Self {
        if let EndpointTarget::Upstream { form, .. } = &mut self.target {
            form.push(binding);
        }
        self
    }
}

/// The table served when settings do not override it.
pub fn default_endpoints() -> Vec<EndpointSpec> {
    vec![
        EndpointSpec::aggregate("live-matches", "/matches/live", Feed::Live),
        EndpointSpec::aggregate("upcoming-matches", "/matches/upcoming", Feed::Upcoming),
        EndpointSpec::aggregate("series-list", "/series", Feed::Series),
        EndpointSpec::aggregate("news", "/news", Feed::News),
        EndpointSpec::upstream("recent-matches", "/matches/recent", "/matches/recent"),
        EndpointSpec::upstream(
            "scorecard",
            "/matches/{match_id}/scorecard",
            "/match/{match_id}/scorecard",
        ),
        EndpointSpec::upstream("match-info", "/matches/{match_id}/info", "/match/{match_id}/info"),
        EndpointSpec::upstream(
            "points-table",
            "/series/{series_id}/points-table",
            "/series/points-table",
        )
        .post_form()
        .form(ParamBinding::required("series_id")),
        EndpointSpec::upstream("team-rankings", "/rankings/teams", "/rankings/teams")
            .query(ParamBinding::optional("format")),
        EndpointSpec::upstream("search", "/search", "/search").query(ParamBinding::required("q")),
    ]
}

/// How a compiled endpoint is served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Project a feed from the aggregate snapshot.
    Aggregate(Feed),
    /// Forward to the upstream.
    Upstream(UpstreamRoute),
}

/// A compiled pass-through target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRoute {
    template: PathTemplate,
    method: UpstreamMethod,
    query: Vec<ParamBinding>,
    form: Vec<ParamBinding>,
}

impl UpstreamRoute {
    /// Builds the outbound request, validating every required parameter
    /// before anything is sent.
    pub fn resolve(&self, params: &Params) -> Result<UpstreamRequest> {
        let path = self.template.render(params)?;

        let mut request = match self.method {
            UpstreamMethod::Get => UpstreamRequest::get(path),
            UpstreamMethod::PostForm => UpstreamRequest::post_form(path),
        };

        for binding in &self.query {
            if let Some((name, value)) = binding.resolve(params)? {
                request = request.with_query(name, value);
            }
        }
        for binding in &self.form {
            if let Some((name, value)) = binding.resolve(params)? {
                request = request.with_form(name, value);
            }
        }

        Ok(request)
    }

    /// The upstream path template.
    pub fn template(&self) -> &PathTemplate {
        &self.template
    }
}

/// A validated endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    name: String,
    route: String,
    shape: String,
    target: Route,
}

impl Endpoint {
    /// Compiles a spec, parsing its upstream template.
    pub fn compile(spec: EndpointSpec) -> Result<Self> {
        if spec.name.trim().is_empty() {
            return Err(PitchsideError::invalid_config("endpoint name cannot be empty"));
        }
        if !spec.route.starts_with('/') {
            return Err(PitchsideError::invalid_config(format!(
                "route '{}' of endpoint '{}' must start with '/'",
                spec.route, spec.name
            )));
        }
        let shape = PathTemplate::parse(&spec.route)?.shape();

        let target = match spec.target {
            EndpointTarget::Aggregate { feed } => Route::Aggregate(feed),
            EndpointTarget::Upstream {
                path,
                method,
                query,
                form,
            } => {
                if method == UpstreamMethod::Get && !form.is_empty() {
                    return Err(PitchsideError::invalid_config(format!(
                        "endpoint '{}' declares form fields but is not a form POST",
                        spec.name
                    )));
                }
                Route::Upstream(UpstreamRoute {
                    template: PathTemplate::parse(&path)?,
                    method,
                    query,
                    form,
                })
            },
        };

        Ok(Self {
            name: spec.name,
            route: spec.route,
            shape,
            target,
        })
    }

    /// Logical resource name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inbound route.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// How the endpoint is served.
    pub fn target(&self) -> &Route {
        &self.target
    }
}

/// The compiled set of endpoints.
#[derive(Debug, Clone, Default)]
pub struct EndpointTable {
    endpoints: Vec<Endpoint>,
}

impl EndpointTable {
    /// Compiles specs, rejecting duplicate names and routes that match the
    /// same paths (`/matches/{a}` and `/matches/{b}` collide).
    ///
    /// ```
    /// use pitchside_core::{default_endpoints, EndpointTable};
    ///
    /// let table = EndpointTable::compile(default_endpoints()).unwrap();
    /// assert!(table.get("scorecard").is_some());
    /// ```
    pub fn compile(specs: Vec<EndpointSpec>) -> Result<Self> {
        let mut names = HashSet::new();
        let mut routes: HashMap<String, String> = HashMap::new();
        let mut endpoints = Vec::with_capacity(specs.len());

        for spec in specs {
            let endpoint = Endpoint::compile(spec)?;

            if !names.insert(endpoint.name.clone()) {
                return Err(PitchsideError::invalid_config(format!(
                    "duplicate endpoint name '{}'",
                    endpoint.name
                )));
            }
            if let Some(existing) = routes.get(&endpoint.shape) {
                return Err(PitchsideError::invalid_config(format!(
                    "route '{}' conflicts with '{}'",
                    endpoint.route, existing
                )));
            }
            routes.insert(endpoint.shape.clone(), endpoint.route.clone());

            endpoints.push(endpoint);
        }

        Ok(Self { endpoints })
    }

    /// Looks an endpoint up by name.
    pub fn get(&self, name: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    /// Iterates endpoints in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> + '_ {
        self.endpoints.iter()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
