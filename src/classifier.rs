use std::path::Path;

use image::DynamicImage;
use tract_onnx::prelude::*;

use crate::error::ClassifierError;
use crate::models::TumorClass;
use crate::preprocess;

type NnModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Anything that can score a decoded scan against the known classes.
pub trait Classifier: Send + Sync {
    /// Raw per-class scores, one per `TumorClass` in index order.
    fn predict(&self, image: &DynamicImage) -> Result<Vec<f32>, ClassifierError>;
}

pub fn classify(
    classifier: &dyn Classifier,
    image: &DynamicImage,
) -> Result<TumorClass, ClassifierError> {
    let scores = classifier.predict(image)?;
    TumorClass::from_scores(&scores)
}

/// The exported Keras model, run with tract.
pub struct OnnxClassifier {
    model: NnModel,
    height: u32,
    width: u32,
}

impl OnnxClassifier {
    pub fn load<P: AsRef<Path>>(path: P, height: u32, width: u32) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let load_err = |e: TractError| ClassifierError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let input_fact = InferenceFact::dt_shape(
            f32::datum_type(),
            tvec!(1, height as usize, width as usize, 1),
        );
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(load_err)?
            .with_input_fact(0, input_fact)
            .map_err(load_err)?
            .into_optimized()
            .map_err(load_err)?
            .into_runnable()
            .map_err(load_err)?;

        log::info!("Loaded model {} ({}x{} grayscale input)", path.display(), width, height);

        Ok(Self {
            model,
            height,
            width,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, image: &DynamicImage) -> Result<Vec<f32>, ClassifierError> {
        let input: Tensor = preprocess::to_input_tensor(image, self.height, self.width).into();

        let result = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let output = result
            .first()
            .ok_or_else(|| ClassifierError::Inference("model returned no outputs".to_string()))?
            .to_array_view::<f32>()
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        Ok(output.iter().copied().collect())
    }
}
