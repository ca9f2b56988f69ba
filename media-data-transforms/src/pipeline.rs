//! Preprocessing step trait and pipelines of steps

use media_data_core::Result;

/// A transformation of one datapoint into another of the same kind
///
/// Image steps take and return an [`image::RgbImage`]; audio steps take and
/// return an [`media_data_core::AudioClip`]. Any `FnMut(T) -> Result<T>`
/// closure is a step as well.
pub trait PreprocessingStep<T> {
    /// Transform one datapoint
    fn apply(&mut self, input: T) -> Result<T>;
}

impl<T, F> PreprocessingStep<T> for F
where
    F: FnMut(T) -> Result<T>,
{
    fn apply(&mut self, input: T) -> Result<T> {
        self(input)
    }
}

/// An ordered chain of steps applied as a single step
///
/// The output of each step is the input of the next. All steps share the
/// datapoint type `T`, so a pipeline can never turn an image into audio.
pub struct PreprocessingPipeline<T> {
    /// The steps in application order
    steps: Vec<Box<dyn PreprocessingStep<T>>>,
}

impl<T> PreprocessingPipeline<T> {
    /// Create an empty pipeline, which returns its input unchanged
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Create a pipeline from boxed steps
    pub fn from_steps(steps: Vec<Box<dyn PreprocessingStep<T>>>) -> Self {
        Self { steps }
    }

    /// Append a step
    #[must_use]
    pub fn with_step<S>(mut self, step: S) -> Self
    where
        S: PreprocessingStep<T> + 'static,
    {
        self.steps.push(Box::new(step));
        self
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the pipeline has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<T> Default for PreprocessingPipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PreprocessingStep<T> for PreprocessingPipeline<T> {
    fn apply(&mut self, input: T) -> Result<T> {
        let mut current = input;

        for step in &mut self.steps {
            current = step.apply(current)?;
        }

        Ok(current)
    }
}
