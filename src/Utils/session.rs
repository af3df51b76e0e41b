//! # Integration session
//!
//! Runs integration tasks on behalf of the binary:
//! 1) compiles each distinct formula once and keeps it in a cache keyed by the trimmed text
//! 2) integrates the tasks (in parallel for a whole task list)
//! 3) logs every outcome and collects it for the summary table
use crate::Utils::task_parser::TaskSpec;
use crate::error::IntegrationError;
use crate::numerical::integrate_api::{
    IntegrationRequest, IntegrationResult, IntegrationSettings, Method, integrate_batch,
};
use crate::symbolic::expression::Expression;
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::time::Instant;
use tabled::{builder::Builder, settings::Style};

/// result of one task as shown in the summary
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub label: String,
    pub method: String,
    pub interval: (f64, f64),
    pub result: Result<IntegrationResult, IntegrationError>,
}

pub struct IntegrationSession {
    settings: IntegrationSettings,
    cache: HashMap<String, Expression>,
    outcomes: Vec<TaskOutcome>,
    compilations: usize,
    cache_hits: usize,
    elapsed_ms: u128,
}

impl IntegrationSession {
    pub fn new(settings: IntegrationSettings) -> Self {
        IntegrationSession {
            settings,
            cache: HashMap::new(),
            outcomes: Vec::new(),
            compilations: 0,
            cache_hits: 0,
            elapsed_ms: 0,
        }
    }

    pub fn settings(&self) -> &IntegrationSettings {
        &self.settings
    }

    /// Returns the compiled formula, compiling it on first use. Failed compilations are not cached.
    pub fn expression(&mut self, formula: &str) -> Result<Expression, IntegrationError> {
        let key = formula.trim();
        if let Some(expression) = self.cache.get(key) {
            self.cache_hits += 1;
            return Ok(expression.clone());
        }
        self.compilations += 1;
        let expression = Expression::compile(key)?;
        let tree = expression.tree();
        debug!(
            "compiled '{}', names used: {}",
            key,
            tree.identifiers().join(", ")
        );
        if !tree.contains_variable() {
            warn!("'{}' does not depend on x", key);
        }
        self.cache.insert(key.to_string(), expression.clone());
        Ok(expression)
    }

    fn request(&mut self, task: &TaskSpec) -> Result<IntegrationRequest, IntegrationError> {
        let method: Method = task.method.parse()?;
        let expression = self.expression(&task.function)?;
        let mut request = IntegrationRequest::new(expression, task.a, task.b, method);
        request.options = task.options();
        Ok(request)
    }

    fn record(&mut self, task: &TaskSpec, result: Result<IntegrationResult, IntegrationError>) {
        match &result {
            Ok(res) if res.description.contains("max depth reached") => {
                warn!("task '{}': {} (tolerance not met)", task.label(), res)
            }
            Ok(res) => info!("task '{}': {}", task.label(), res),
            Err(err) => error!("task '{}' failed: {}", task.label(), err),
        }
        self.outcomes.push(TaskOutcome {
            label: task.label().to_string(),
            method: task.method.clone(),
            interval: (task.a, task.b),
            result,
        });
    }

    /// Compiles (or reuses) the formula of one task and integrates it.
    pub fn run_task(&mut self, task: &TaskSpec) -> &TaskOutcome {
        let begin = Instant::now();
        let result = self
            .request(task)
            .and_then(|request| request.integrate_with(&self.settings));
        self.elapsed_ms += begin.elapsed().as_millis();
        self.record(task, result);
        &self.outcomes[self.outcomes.len() - 1]
    }

    /// Compiles every formula up front, then integrates all tasks that compiled in parallel.
    /// Outcomes are recorded in task order.
    pub fn run_all(&mut self, tasks: &[TaskSpec]) -> &[TaskOutcome] {
        info!("running {} integration task(s)", tasks.len());
        let begin = Instant::now();
        let first = self.outcomes.len();
        let prepared: Vec<Result<IntegrationRequest, IntegrationError>> =
            tasks.iter().map(|task| self.request(task)).collect();
        let requests: Vec<IntegrationRequest> = prepared
            .iter()
            .filter_map(|prepared| prepared.as_ref().ok().cloned())
            .collect();
        let mut integrated = integrate_batch(&requests, &self.settings).into_iter();
        self.elapsed_ms += begin.elapsed().as_millis();
        for (task, prepared) in tasks.iter().zip(prepared) {
            let result = match prepared {
                Ok(_) => match integrated.next() {
                    Some(result) => result,
                    None => continue,
                },
                Err(err) => Err(err),
            };
            self.record(task, result);
        }
        info!("{} task(s) done in {} ms", tasks.len(), self.elapsed_ms);
        &self.outcomes[first..]
    }

    pub fn outcomes(&self) -> &[TaskOutcome] {
        &self.outcomes
    }

    /// number of distinct formulas compiled successfully
    pub fn cached_expressions(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits
    }

    /// one row per task: label, method, interval, value, evaluations and description or error
    pub fn summary_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(vec![
            "task".to_string(),
            "method".to_string(),
            "interval".to_string(),
            "value".to_string(),
            "evaluations".to_string(),
            "description".to_string(),
        ]);
        for outcome in &self.outcomes {
            let (value, evaluations, description) = match &outcome.result {
                Ok(res) => (
                    format!("{:.10}", res.value),
                    res.evaluation_count.to_string(),
                    res.description.clone(),
                ),
                Err(err) => ("-".to_string(), "-".to_string(), err.to_string()),
            };
            builder.push_record(vec![
                outcome.label.clone(),
                outcome.method.clone(),
                format!("[{}, {}]", outcome.interval.0, outcome.interval.1),
                value,
                evaluations,
                description,
            ]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }

    /// session statistics: tasks, failures, total evaluations and cache use
    pub fn statistics_table(&self) -> String {
        let failed = self.outcomes.iter().filter(|o| o.result.is_err()).count();
        let evaluations: usize = self
            .outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|res| res.evaluation_count)
            .sum();
        let stats = vec![
            ("tasks", self.outcomes.len().to_string()),
            ("failed tasks", failed.to_string()),
            ("integrand evaluations", evaluations.to_string()),
            ("formulas compiled", self.compilations.to_string()),
            ("compiled formula cache hits", self.cache_hits.to_string()),
            ("time, ms", self.elapsed_ms.to_string()),
        ];
        let mut builder = Builder::default();
        for (key, value) in stats {
            builder.push_record(vec![key.to_string(), value]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}
