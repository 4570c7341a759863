use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Mutex;

use async_trait::async_trait;
use recap::llm::{CompletionRequest, LlmProvider, TokenCounter};
use recap::{RecapError, Result};
use tempfile::TempDir;

pub fn run_recap(args: &[&str]) -> Output {
    TestEnv::new().run(args)
}

/// Isolated HOME and XDG directories for running the binary.
pub struct TestEnv {
    home: TempDir,
    config: TempDir,
    data: TempDir,
    work: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
            data: tempfile::tempdir().expect("create temporary XDG data dir"),
            work: tempfile::tempdir().expect("create temporary work dir"),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_recap"))
            .args(args)
            .current_dir(self.work.path())
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env("XDG_DATA_HOME", self.data.path())
            .env_remove("RECAP_API_KEY")
            .env_remove("OPENROUTER_API_KEY")
            .env_remove("RECAP_MODEL")
            .env_remove("RECAP_FORMATTER_MODEL")
            .env_remove("RECAP_CONTEXT_WINDOW")
            .env_remove("RECAP_MAX_OUTPUT")
            .env_remove("RECAP_ENDPOINT")
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to execute recap binary")
    }

    #[allow(dead_code)]
    pub fn work_dir(&self) -> &Path {
        self.work.path()
    }

    /// Write a file into the work directory and return its path.
    #[allow(dead_code)]
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.work.path().join(name);
        std::fs::write(&path, contents).expect("write test file");
        path
    }
}

/// One recorded provider call.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Call {
    pub prompt: String,
    pub model: String,
    pub max_tokens: u32,
}

/// Provider that replays canned responses in order and records every call.
///
/// Running out of responses is reported as a transport failure.
#[allow(dead_code)]
pub struct ScriptedProvider {
    responses: Mutex<Vec<String>>,
    calls: Mutex<Vec<Call>>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn new(responses: &[&str]) -> Self {
        let mut responses: Vec<String> = responses.iter().map(|r| r.to_string()).collect();
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String> {
        self.calls.lock().unwrap().push(Call {
            prompt: request.prompt.to_string(),
            model: request.model.to_string(),
            max_tokens: request.max_tokens,
        });

        self.responses
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| RecapError::Transport("no scripted response left".to_string()))
    }
}

/// One token per whitespace-separated word.
#[allow(dead_code)]
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn count(&self, text: &str, _model: &str) -> usize {
        text.split_whitespace().count()
    }
}
