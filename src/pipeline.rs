//! Filter-spec parsing and sequenced application.
//!
//! A pipeline starts *pending* (steps parsed, nothing applied) and becomes
//! *applied* by [`Pipeline::run`], which consumes it. Steps execute strictly
//! in the order given; the first failure stops the run and reports which
//! step failed. Filters that completed before the failure stay applied —
//! apply what you can, report where it stopped.

use crate::filters::{Engine, FilterError, FilterRegistry};
use crate::raster::Raster;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("filter '{name}' (step {step}) failed: {source}")]
    Step {
        step: usize,
        name: String,
        source: FilterError,
    },
}

/// One requested transform: a filter name plus its positional string
/// parameters, exactly as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterStep {
    pub name: String,
    pub params: Vec<String>,
}

impl fmt::Display for FilterStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}:{}", self.name, self.params.join(","))
        }
    }
}

/// Parse `name[:param1,param2,...]` specs into steps.
///
/// No colon means no parameters; so does an empty list after the colon.
/// Empty tokens between commas are kept — they fail later as malformed
/// parameters rather than being silently dropped.
pub fn parse_steps(specs: &[String]) -> Vec<FilterStep> {
    specs
        .iter()
        .map(|spec| match spec.split_once(':') {
            Some((name, rest)) if !rest.is_empty() => FilterStep {
                name: name.to_string(),
                params: rest.split(',').map(str::to_string).collect(),
            },
            Some((name, _)) => FilterStep {
                name: name.to_string(),
                params: Vec::new(),
            },
            None => FilterStep {
                name: spec.clone(),
                params: Vec::new(),
            },
        })
        .collect()
}

/// An ordered chain of filter steps, not yet applied.
#[derive(Debug)]
pub struct Pipeline {
    steps: Vec<FilterStep>,
}

impl Pipeline {
    pub fn new(steps: Vec<FilterStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[FilterStep] {
        &self.steps
    }

    /// Apply every step to the raster in order.
    ///
    /// Consumes the pipeline: a chain runs once. Each step resolves its
    /// filter against the registry, then executes on the engine; the first
    /// failure is reported with the step's position and name, leaving the
    /// raster as the preceding steps produced it.
    pub fn run(
        self,
        raster: &mut Raster,
        registry: &FilterRegistry,
        engine: &Engine,
    ) -> Result<(), PipelineError> {
        for (index, step) in self.steps.into_iter().enumerate() {
            let filter =
                registry
                    .resolve(&step.name, &step.params)
                    .map_err(|source| PipelineError::Step {
                        step: index + 1,
                        name: step.name.clone(),
                        source,
                    })?;
            engine.run(raster, &filter);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::gradient_raster;

    fn specs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_bare_name() {
        let steps = parse_steps(&specs(&["negative"]));
        assert_eq!(
            steps,
            vec![FilterStep {
                name: "negative".into(),
                params: vec![]
            }]
        );
    }

    #[test]
    fn parse_name_with_params() {
        let steps = parse_steps(&specs(&["unsharp:5,150"]));
        assert_eq!(steps[0].name, "unsharp");
        assert_eq!(steps[0].params, vec!["5", "150"]);
    }

    #[test]
    fn parse_trailing_colon_means_no_params() {
        let steps = parse_steps(&specs(&["grayscale:"]));
        assert_eq!(steps[0].name, "grayscale");
        assert!(steps[0].params.is_empty());
    }

    #[test]
    fn parse_keeps_empty_tokens_between_commas() {
        let steps = parse_steps(&specs(&["unsharp:5,,150"]));
        assert_eq!(steps[0].params, vec!["5", "", "150"]);
    }

    #[test]
    fn parse_preserves_order() {
        let steps = parse_steps(&specs(&["grayscale", "threshold:4", "boxblur:3"]));
        let names: Vec<_> = steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["grayscale", "threshold", "boxblur"]);
    }

    #[test]
    fn step_display_round_trips_the_spec() {
        let steps = parse_steps(&specs(&["unsharp:5,150", "negative"]));
        assert_eq!(steps[0].to_string(), "unsharp:5,150");
        assert_eq!(steps[1].to_string(), "negative");
    }

    #[test]
    fn run_applies_steps_in_order() {
        // negative then grayscale is not grayscale then negative.
        let registry = FilterRegistry::builtin();
        let engine = Engine::new(2).unwrap();

        let mut forward = gradient_raster(6, 4);
        Pipeline::new(parse_steps(&specs(&["negative", "grayscale"])))
            .run(&mut forward, &registry, &engine)
            .unwrap();

        let mut reversed = gradient_raster(6, 4);
        Pipeline::new(parse_steps(&specs(&["grayscale", "negative"])))
            .run(&mut reversed, &registry, &engine)
            .unwrap();

        assert_ne!(forward, reversed);
    }

    #[test]
    fn run_stops_at_first_failure_and_names_the_step() {
        let registry = FilterRegistry::builtin();
        let engine = Engine::new(1).unwrap();
        let mut raster = gradient_raster(4, 4);

        let err = Pipeline::new(parse_steps(&specs(&["negative", "vignette", "grayscale"])))
            .run(&mut raster, &registry, &engine)
            .unwrap_err();
        let PipelineError::Step { step, name, source } = err;
        assert_eq!(step, 2);
        assert_eq!(name, "vignette");
        assert!(matches!(source, FilterError::UnknownFilter(_)));

        // The completed first step stays applied — no rollback.
        let mut negated = gradient_raster(4, 4);
        Pipeline::new(parse_steps(&specs(&["negative"])))
            .run(&mut negated, &registry, &engine)
            .unwrap();
        assert_eq!(raster, negated);
    }

    #[test]
    fn run_reports_bad_parameters() {
        let registry = FilterRegistry::builtin();
        let engine = Engine::new(1).unwrap();
        let mut raster = gradient_raster(4, 4);

        let err = Pipeline::new(parse_steps(&specs(&["boxblur:4"])))
            .run(&mut raster, &registry, &engine)
            .unwrap_err();
        let PipelineError::Step { step, name, source } = err;
        assert_eq!((step, name.as_str()), (1, "boxblur"));
        assert!(matches!(source, FilterError::InvalidParameter(_)));
        // Nothing ran: the raster is untouched.
        assert_eq!(raster, gradient_raster(4, 4));
    }
}
