//! In-crate fakes for the pipeline ports.

use std::sync::Mutex;

use async_trait::async_trait;
use pipeline::{
    ClientError, LogEntry, LogStoreError, ModelId, NewLogEntry, RunId, RunLogStore, TextGenerator,
    WebSearcher,
};

/// Which agent prompt a generator call belongs to, recognised by its opening line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Topics,
    Writer,
    FactCheck,
    Polish,
}

impl Role {
    fn of(prompt: &str) -> Role {
        if prompt.starts_with("You are a research assistant") {
            Role::Topics
        } else if prompt.starts_with("You are a blog writer") {
            Role::Writer
        } else if prompt.starts_with("You are a fact-checker") {
            Role::FactCheck
        } else if prompt.starts_with("You are a style editor") {
            Role::Polish
        } else {
            panic!("unrecognised prompt: {prompt}")
        }
    }
}

type Reply = Box<dyn Fn(usize, &str) -> Result<String, ClientError> + Send + Sync>;

/// A generator that answers each agent role from a script.
///
/// Each reply closure receives the 0-based index of the call within its role
/// and the full prompt.
pub(crate) struct ScriptedGenerator {
    topics: Reply,
    writer: Reply,
    fact_check: Reply,
    polish: Reply,
    calls: Mutex<Vec<(Role, Option<ModelId>, String)>>,
}

impl ScriptedGenerator {
    /// Topics `X features, X benefits`, a draft, a passing check, and a polish.
    pub(crate) fn happy() -> Self {
        Self {
            topics: Box::new(|_, _| Ok("X features, X benefits".to_string())),
            writer: Box::new(|n, _| Ok(format!("Draft {} about X", n + 1))),
            fact_check: Box::new(|_, _| Ok("PASS".to_string())),
            polish: Box::new(|_, prompt| {
                let draft = prompt.rsplit("\n\n").next().unwrap_or_default();
                Ok(format!("Polished: {draft}"))
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn topics(
        mut self,
        f: impl Fn(usize, &str) -> Result<String, ClientError> + Send + Sync + 'static,
    ) -> Self {
        self.topics = Box::new(f);
        self
    }

    pub(crate) fn writer(
        mut self,
        f: impl Fn(usize, &str) -> Result<String, ClientError> + Send + Sync + 'static,
    ) -> Self {
        self.writer = Box::new(f);
        self
    }

    pub(crate) fn fact_check(
        mut self,
        f: impl Fn(usize, &str) -> Result<String, ClientError> + Send + Sync + 'static,
    ) -> Self {
        self.fact_check = Box::new(f);
        self
    }

    pub(crate) fn polish(
        mut self,
        f: impl Fn(usize, &str) -> Result<String, ClientError> + Send + Sync + 'static,
    ) -> Self {
        self.polish = Box::new(f);
        self
    }

    /// Number of calls made for `role`.
    pub(crate) fn count(&self, role: Role) -> usize {
        self.calls.lock().unwrap().iter().filter(|(r, _, _)| *r == role).count()
    }

    /// Prompts sent for `role`, in call order.
    pub(crate) fn prompts(&self, role: Role) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _, _)| *r == role)
            .map(|(_, _, p)| p.clone())
            .collect()
    }

    /// Models requested for `role`, in call order.
    pub(crate) fn models(&self, role: Role) -> Vec<Option<ModelId>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _, _)| *r == role)
            .map(|(_, m, _)| m.clone())
            .collect()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, model: Option<&ModelId>) -> Result<String, ClientError> {
        let role = Role::of(prompt);
        let index = {
            let mut calls = self.calls.lock().unwrap();
            let index = calls.iter().filter(|(r, _, _)| *r == role).count();
            calls.push((role, model.cloned(), prompt.to_string()));
            index
        };
        let reply = match role {
            Role::Topics => &self.topics,
            Role::Writer => &self.writer,
            Role::FactCheck => &self.fact_check,
            Role::Polish => &self.polish,
        };
        reply(index, prompt)
    }
}

/// A searcher returning one snippet per query and recording the queries.
#[derive(Default)]
pub(crate) struct RecordingSearcher {
    queries: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl RecordingSearcher {
    /// Fails with a provider error when asked for `query`.
    pub(crate) fn failing_on(query: &str) -> Self {
        Self {
            queries: Mutex::new(Vec::new()),
            fail_on: Some(query.to_string()),
        }
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearcher for RecordingSearcher {
    async fn search(&self, query: &str) -> Result<Vec<String>, ClientError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail_on.as_deref() == Some(query) {
            return Err(ClientError::provider("Tavily", "status 502 Bad Gateway"));
        }
        Ok(vec![format!("{query} snippet")])
    }
}

/// A log store whose every call fails.
#[derive(Default)]
pub(crate) struct BrokenLogStore {
    appends: Mutex<usize>,
}

impl BrokenLogStore {
    pub(crate) fn attempted_appends(&self) -> usize {
        *self.appends.lock().unwrap()
    }
}

#[async_trait]
impl RunLogStore for BrokenLogStore {
    async fn append(&self, _entry: &NewLogEntry) -> Result<(), LogStoreError> {
        *self.appends.lock().unwrap() += 1;
        Err(LogStoreError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    }

    async fn list_run(&self, _run_id: RunId) -> Result<Vec<LogEntry>, LogStoreError> {
        Err(LogStoreError::Request {
            message: "connection refused".to_string(),
        })
    }
}
