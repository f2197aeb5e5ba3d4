use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Sentinel the extraction questions ask the model to answer with when a
/// field is not on the page.
pub const NOT_FOUND: &str = "NA";

/// Default page limit for the extract step.
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// How many items the extract step should produce per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// One item per page.
    Single,
    /// Many items per page (menu cards, listings).
    Multiple,
    /// Let the service decide.
    Auto,
}

/// Which rendering of the page the extractor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageView {
    Html,
    Text,
    Selectors,
}

/// A workflow description submitted to `POST /api/v2/workflows`.
///
/// Built once through [`Workflow::builder`] and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Workflow {
    steps: Vec<Step>,
    options: WorkflowOptions,
}

impl Workflow {
    /// Start a single-URL extraction workflow.
    pub fn builder(url: impl Into<String>) -> WorkflowBuilder {
        WorkflowBuilder {
            url: url.into(),
            questions: IndexMap::new(),
            mode: ExtractMode::Multiple,
            view: PageView::Html,
            max_pages: DEFAULT_MAX_PAGES,
            limit: None,
        }
    }

    /// The seeded target URL.
    pub fn url(&self) -> Option<&str> {
        self.steps.iter().find_map(|step| match step {
            Step::Const(args) => args.items.first().map(|seed| seed.url.as_str()),
            _ => None,
        })
    }

    /// The questions asked by the extract step, in submission order.
    pub fn questions(&self) -> Option<&IndexMap<String, String>> {
        self.steps.iter().find_map(|step| match step {
            Step::Extract(args) => Some(&args.questions),
            _ => None,
        })
    }
}

/// Builder for [`Workflow`].
#[derive(Debug, Clone)]
pub struct WorkflowBuilder {
    url: String,
    questions: IndexMap<String, String>,
    mode: ExtractMode,
    view: PageView,
    max_pages: u32,
    limit: Option<u32>,
}

impl WorkflowBuilder {
    /// Ask one question, answered into the field `key`.
    pub fn question(mut self, key: impl Into<String>, question: impl Into<String>) -> Self {
        self.questions.insert(key.into(), question.into());
        self
    }

    pub fn questions<K, Q>(mut self, questions: impl IntoIterator<Item = (K, Q)>) -> Self
    where
        K: Into<String>,
        Q: Into<String>,
    {
        self.questions
            .extend(questions.into_iter().map(|(k, q)| (k.into(), q.into())));
        self
    }

    pub fn mode(mut self, mode: ExtractMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn view(mut self, view: PageView) -> Self {
        self.view = view;
        self
    }

    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Cap the number of items the workflow returns. Unlimited by default.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(self) -> Workflow {
        Workflow {
            steps: vec![
                Step::Const(ConstArgs {
                    items: vec![SeedItem { url: self.url }],
                    max_pages: 1,
                }),
                Step::Extract(ExtractArgs {
                    questions: self.questions,
                    mode: self.mode,
                    view: self.view,
                    max_pages: self.max_pages,
                }),
            ],
            options: WorkflowOptions { limit: self.limit },
        }
    }
}

/// One named workflow step, serialized as `{"name": ..., "args": {...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "name", content = "args", rename_all = "lowercase")]
pub enum Step {
    Const(ConstArgs),
    Extract(ExtractArgs),
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstArgs {
    pub items: Vec<SeedItem>,
    #[serde(rename = "maxPages")]
    pub max_pages: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedItem {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractArgs {
    pub questions: IndexMap<String, String>,
    pub mode: ExtractMode,
    pub view: PageView,
    /// The API takes this one as a string.
    #[serde(rename = "maxPages", serialize_with = "serialize_as_string")]
    pub max_pages: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowOptions {
    pub limit: Option<u32>,
}

fn serialize_as_string<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(
    /// Identifier returned by `POST /api/v2/workflows`.
    WorkflowId
);

opaque_id!(
    /// Identifier returned by `POST /api/v2/workflows/{id}/run`.
    JobId
);

/// Identifiers come back as strings, but numbers are accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    pub(crate) fn into_string(self) -> Option<String> {
        match self {
            RawId::Text(s) if s.trim().is_empty() => None,
            RawId::Text(s) => Some(s),
            RawId::Number(n) => Some(n.to_string()),
        }
    }
}

/// Response of `POST /api/v2/workflows`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreateWorkflowResponse {
    pub id: Option<RawId>,
}

/// Response of `POST /api/v2/workflows/{id}/run`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RunWorkflowResponse {
    #[serde(rename = "jobId")]
    pub job_id: Option<RawId>,
}

/// Response of `GET /api/v2/jobs/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub done: bool,
    #[serde(default)]
    pub results: Option<JobResults>,
}

impl JobStatus {
    /// A finished job carrying the given items.
    pub fn finished(items: Vec<ExtractedItem>) -> Self {
        Self {
            done: true,
            results: Some(JobResults { items }),
        }
    }

    /// A job still running with no partial results.
    pub fn pending() -> Self {
        Self::default()
    }
}

/// Result payload of a job. A missing `items` key reads as no items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobResults {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<ExtractedItem>,
}

/// An explicit `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One item produced by the extract step: question key to answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedItem(Map<String, Value>);

impl ExtractedItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an answer (builder pattern).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// The answer for `key` as text.
    ///
    /// Lists are joined with `", "`. `null`, a missing key, and an empty list
    /// read as no answer. Other scalars are rendered as JSON text.
    pub fn answer(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Array(values) if values.is_empty() => None,
            Value::Array(values) => Some(
                values
                    .iter()
                    .map(render_scalar)
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            other => Some(other.to_string()),
        }
    }

    /// The answer for `key`, or [`NOT_FOUND`] when there is none.
    pub fn answer_or_na(&self, key: &str) -> String {
        self.answer(key).unwrap_or_else(|| NOT_FOUND.to_string())
    }
}

impl From<Map<String, Value>> for ExtractedItem {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_workflow_wire_shape() {
        let workflow = Workflow::builder("https://example.com/menu")
            .question("meal_name", "What is the name of this meal?")
            .question("price", "What is the price?")
            .build();

        let value = serde_json::to_value(&workflow).unwrap();
        assert_eq!(
            value,
            json!({
                "steps": [
                    {
                        "name": "const",
                        "args": {
                            "items": [{"url": "https://example.com/menu"}],
                            "maxPages": 1
                        }
                    },
                    {
                        "name": "extract",
                        "args": {
                            "questions": {
                                "meal_name": "What is the name of this meal?",
                                "price": "What is the price?"
                            },
                            "mode": "multiple",
                            "view": "html",
                            "maxPages": "1000"
                        }
                    }
                ],
                "options": {"limit": null}
            })
        );
    }

    #[test]
    fn test_questions_keep_insertion_order() {
        let workflow = Workflow::builder("https://example.com")
            .questions([("z", "last?"), ("a", "first?"), ("m", "middle?")])
            .build();

        let keys: Vec<_> = workflow.questions().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);

        let json = serde_json::to_string(&workflow).unwrap();
        let z = json.find("\"z\"").unwrap();
        let a = json.find("\"a\"").unwrap();
        assert!(z < a);
    }

    #[test]
    fn test_builder_options() {
        let workflow = Workflow::builder("https://example.com")
            .mode(ExtractMode::Single)
            .view(PageView::Text)
            .max_pages(5)
            .limit(10)
            .build();

        assert_eq!(workflow.url(), Some("https://example.com"));
        let value = serde_json::to_value(&workflow).unwrap();
        assert_eq!(value["steps"][1]["args"]["mode"], "single");
        assert_eq!(value["steps"][1]["args"]["view"], "text");
        assert_eq!(value["steps"][1]["args"]["maxPages"], "5");
        assert_eq!(value["options"]["limit"], 10);
    }

    #[test]
    fn test_answer_flattens_lists() {
        let item = ExtractedItem::new()
            .with("meal_photos", json!(["https://a/1.jpg", "https://a/2.jpg"]))
            .with("tags", json!([]))
            .with("price", json!(12.5))
            .with("nothing", Value::Null);

        assert_eq!(
            item.answer("meal_photos").as_deref(),
            Some("https://a/1.jpg, https://a/2.jpg")
        );
        assert_eq!(item.answer_or_na("tags"), "NA");
        assert_eq!(item.answer("price").as_deref(), Some("12.5"));
        assert_eq!(item.answer_or_na("nothing"), "NA");
        assert_eq!(item.answer_or_na("missing"), "NA");
    }

    #[test]
    fn test_job_status_tolerates_missing_fields() {
        let status: JobStatus = serde_json::from_value(json!({})).unwrap();
        assert!(!status.done);
        assert!(status.results.is_none());

        let status: JobStatus =
            serde_json::from_value(json!({"done": true, "results": {}})).unwrap();
        assert!(status.done);
        assert!(status.results.unwrap().items.is_empty());
    }

    #[test]
    fn test_job_status_null_fields_read_as_unset() {
        let status: JobStatus =
            serde_json::from_value(json!({"done": null, "results": null})).unwrap();
        assert!(!status.done);
        assert!(status.results.is_none());

        let status: JobStatus =
            serde_json::from_value(json!({"done": true, "results": {"items": null}})).unwrap();
        assert!(status.done);
        assert!(status.results.unwrap().items.is_empty());
    }

    #[test]
    fn test_raw_id_accepts_numbers() {
        let resp: CreateWorkflowResponse = serde_json::from_value(json!({"id": 42})).unwrap();
        assert_eq!(resp.id.and_then(RawId::into_string).as_deref(), Some("42"));

        let resp: RunWorkflowResponse = serde_json::from_value(json!({"jobId": ""})).unwrap();
        assert!(resp.job_id.and_then(RawId::into_string).is_none());
    }
}
