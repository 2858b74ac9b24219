//! Ordered fallback strategies.
//!
//! A [`FallbackChain`] runs its steps in order. Each step may be attempted
//! more than once. The first attempt that yields a value accepted by the
//! chain's predicate wins; errors and empty results are logged and the
//! chain moves on. When every step is exhausted the chain yields `None`
//! and the caller picks its own last-resort answer.

use std::fmt::Display;
use std::future::Future;

use futures::future::{BoxFuture, FutureExt};
use log::{debug, warn};

type StepFn<'a, T, E> =
    Box<dyn Fn() -> BoxFuture<'a, std::result::Result<Option<T>, E>> + Send + Sync + 'a>;

struct Step<'a, T, E> {
    name: &'static str,
    attempts: u32,
    run: StepFn<'a, T, E>,
}

/// The value produced by a chain and the step that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub strategy: &'static str,
    pub value: T,
}

pub struct FallbackChain<'a, T, E> {
    label: String,
    steps: Vec<Step<'a, T, E>>,
    accept: Box<dyn Fn(&T) -> bool + Send + Sync + 'a>,
}

impl<'a, T, E> FallbackChain<'a, T, E>
where
    T: Send + 'a,
    E: Display + Send + 'a,
{
    /// Create an empty chain. `label` prefixes every log line.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            steps: Vec::new(),
            accept: Box::new(|_| true),
        }
    }

    /// Only accept values for which `predicate` holds (e.g. non-empty series).
    pub fn accept_if<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'a,
    {
        self.accept = Box::new(predicate);
        self
    }

    /// Append a step that is attempted once.
    pub fn step<F, Fut>(self, name: &'static str, run: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'a,
        Fut: Future<Output = std::result::Result<Option<T>, E>> + Send + 'a,
    {
        self.step_with_attempts(name, 1, run)
    }

    /// Append a step that is attempted up to `attempts` times.
    pub fn step_with_attempts<F, Fut>(mut self, name: &'static str, attempts: u32, run: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'a,
        Fut: Future<Output = std::result::Result<Option<T>, E>> + Send + 'a,
    {
        self.steps.push(Step {
            name,
            attempts: attempts.max(1),
            run: Box::new(move || run().boxed()),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the steps in order until one yields an accepted value.
    pub async fn run(self) -> Option<Resolved<T>> {
        let Self {
            label,
            steps,
            accept,
        } = self;

        for step in steps {
            for attempt in 1..=step.attempts {
                match (step.run)().await {
                    Ok(Some(value)) if accept(&value) => {
                        debug!("{}: resolved by '{}' on attempt {}", label, step.name, attempt);
                        return Some(Resolved {
                            strategy: step.name,
                            value,
                        });
                    }
                    Ok(Some(_)) => {
                        debug!("{}: '{}' attempt {} returned unusable data", label, step.name, attempt);
                    }
                    Ok(None) => {
                        debug!("{}: '{}' attempt {} returned nothing", label, step.name, attempt);
                    }
                    Err(e) => {
                        warn!(
                            "{}: '{}' attempt {}/{} failed: {}",
                            label, step.name, attempt, step.attempts, e
                        );
                    }
                }
            }
        }

        warn!("{}: all strategies failed", label);
        None
    }
}
