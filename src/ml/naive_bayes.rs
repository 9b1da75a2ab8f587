//! Naive Bayes classifier for genuine/fake review vectors.
//!
//! Every feature is modelled independently given the class. Two likelihood
//! models are available:
//!
//! - [`NaiveBayesKind::Multinomial`] (default): features are non-negative
//!   weights, with per-class term probabilities estimated using additive
//!   (Laplace/Lidstone) smoothing `alpha`;
//! - [`NaiveBayesKind::Gaussian`]: per-class per-feature normal densities,
//!   with `var_smoothing` times the largest feature variance added to every
//!   variance.
//!
//! Prediction sums the feature log-likelihoods and the class log-prior and
//! returns the class with the largest score. Equal scores resolve to
//! [`Label::Genuine`].

use std::f64::consts::PI;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VeracityError};
use crate::ml::types::{FeatureVector, Label, NUM_CLASSES};

/// Lower bound on Gaussian variances.
const MIN_VARIANCE: f64 = 1e-12;

/// Likelihood model used for the features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NaiveBayesKind {
    /// Multinomial event model over non-negative feature weights.
    #[default]
    Multinomial,
    /// Gaussian density per feature.
    Gaussian,
}

/// Classifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveBayesConfig {
    /// Likelihood model.
    pub kind: NaiveBayesKind,
    /// Additive smoothing for the multinomial model.
    pub alpha: f64,
    /// Fraction of the largest feature variance added to every variance in
    /// the Gaussian model.
    pub var_smoothing: f64,
}

impl Default for NaiveBayesConfig {
    fn default() -> Self {
        NaiveBayesConfig {
            kind: NaiveBayesKind::Multinomial,
            alpha: 1.0,
            var_smoothing: 1e-9,
        }
    }
}

impl NaiveBayesConfig {
    /// Check the configuration for unusable values.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(VeracityError::invalid_config(format!(
                "alpha must be a positive number, got {}",
                self.alpha
            )));
        }
        if !(self.var_smoothing.is_finite() && self.var_smoothing >= 0.0) {
            return Err(VeracityError::invalid_config(format!(
                "var_smoothing must be a non-negative number, got {}",
                self.var_smoothing
            )));
        }
        Ok(())
    }
}

/// Per-class feature likelihood parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LikelihoodParams {
    /// Log-probability of each feature under each class.
    Multinomial {
        feature_log_prob: [Vec<f64>; NUM_CLASSES],
    },
    /// Mean and variance of each feature under each class.
    Gaussian {
        means: [Vec<f64>; NUM_CLASSES],
        variances: [Vec<f64>; NUM_CLASSES],
    },
}

/// Parameters estimated by [`NaiveBayesClassifier::fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesModel {
    class_count: [usize; NUM_CLASSES],
    class_log_prior: [f64; NUM_CLASSES],
    n_features: usize,
    params: LikelihoodParams,
}

impl NaiveBayesModel {
    /// Number of training examples of a class.
    pub fn class_count(&self, label: Label) -> usize {
        self.class_count[label.index()]
    }

    /// Prior probability of a class.
    pub fn class_prior(&self, label: Label) -> f64 {
        self.class_log_prior[label.index()].exp()
    }

    /// Dimension of the feature vectors the model was trained on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// The likelihood parameters.
    pub fn params(&self) -> &LikelihoodParams {
        &self.params
    }

    /// Likelihood model of these parameters.
    pub fn kind(&self) -> NaiveBayesKind {
        match self.params {
            LikelihoodParams::Multinomial { .. } => NaiveBayesKind::Multinomial,
            LikelihoodParams::Gaussian { .. } => NaiveBayesKind::Gaussian,
        }
    }

    /// Check that every per-class table has `n_features` entries.
    pub fn validate(&self) -> Result<()> {
        let tables: Vec<&Vec<f64>> = match &self.params {
            LikelihoodParams::Multinomial { feature_log_prob } => feature_log_prob.iter().collect(),
            LikelihoodParams::Gaussian { means, variances } => {
                means.iter().chain(variances.iter()).collect()
            }
        };
        if let Some(table) = tables.iter().find(|t| t.len() != self.n_features) {
            return Err(VeracityError::invalid_input(format!(
                "model expects {} features but a parameter table has {}",
                self.n_features,
                table.len()
            )));
        }
        let bad_variance = match &self.params {
            LikelihoodParams::Gaussian { variances, .. } => variances
                .iter()
                .flatten()
                .any(|v| !(v.is_finite() && *v > 0.0)),
            LikelihoodParams::Multinomial { .. } => false,
        };
        if bad_variance {
            return Err(VeracityError::invalid_input(
                "gaussian variances must be positive",
            ));
        }
        Ok(())
    }

    /// Unnormalized log posterior of each class.
    fn joint_log_likelihood(&self, x: &FeatureVector) -> [f64; NUM_CLASSES] {
        let mut jll = self.class_log_prior;

        match &self.params {
            LikelihoodParams::Multinomial { feature_log_prob } => {
                for (class, score) in jll.iter_mut().enumerate() {
                    *score += x
                        .nonzero()
                        .map(|(j, value)| value * feature_log_prob[class][j])
                        .sum::<f64>();
                }
            }
            LikelihoodParams::Gaussian { means, variances } => {
                for (class, score) in jll.iter_mut().enumerate() {
                    let (mean, var) = (&means[class], &variances[class]);
                    let mut log_density = 0.0;
                    for (j, &value) in x.values().iter().enumerate() {
                        let diff = value - mean[j];
                        log_density -= 0.5 * (2.0 * PI * var[j]).ln();
                        log_density -= 0.5 * diff * diff / var[j];
                    }
                    *score += log_density;
                }
            }
        }

        jll
    }
}

/// Binary Naive Bayes classifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NaiveBayesClassifier {
    config: NaiveBayesConfig,
    model: Option<NaiveBayesModel>,
}

impl NaiveBayesClassifier {
    /// Create an untrained classifier.
    pub fn new(config: NaiveBayesConfig) -> Result<Self> {
        config.validate()?;
        Ok(NaiveBayesClassifier {
            config,
            model: None,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &NaiveBayesConfig {
        &self.config
    }

    /// Whether [`fit`](Self::fit) has succeeded.
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// The trained model, if any.
    pub fn model(&self) -> Option<&NaiveBayesModel> {
        self.model.as_ref()
    }

    /// Check the configuration and, if trained, the model.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        if let Some(model) = &self.model {
            model.validate()?;
            if model.kind() != self.config.kind {
                return Err(VeracityError::invalid_input(format!(
                    "model is {:?} but the configuration asks for {:?}",
                    model.kind(),
                    self.config.kind
                )));
            }
        }
        Ok(())
    }

    /// Estimate class priors and feature likelihoods.
    ///
    /// Both classes must be present. On error the previously trained model,
    /// if any, is left untouched.
    pub fn fit(&mut self, vectors: &[FeatureVector], labels: &[Label]) -> Result<()> {
        if vectors.is_empty() {
            return Err(VeracityError::invalid_input(
                "cannot train a classifier without examples",
            ));
        }
        if vectors.len() != labels.len() {
            return Err(VeracityError::invalid_input(format!(
                "got {} feature vectors but {} labels",
                vectors.len(),
                labels.len()
            )));
        }

        let n_features = vectors[0].len();
        if let Some(bad) = vectors.iter().position(|v| v.len() != n_features) {
            return Err(VeracityError::invalid_input(format!(
                "feature vector {bad} has {} features, expected {n_features}",
                vectors[bad].len()
            )));
        }
        if vectors
            .iter()
            .any(|v| v.values().iter().any(|value| !value.is_finite()))
        {
            return Err(VeracityError::invalid_input(
                "feature vectors contain non-finite values",
            ));
        }

        let mut class_count = [0usize; NUM_CLASSES];
        for label in labels {
            class_count[label.index()] += 1;
        }
        if let Some(missing) = Label::ALL.iter().find(|l| class_count[l.index()] == 0) {
            return Err(VeracityError::invalid_input(format!(
                "training data has no {missing} examples; both classes are required"
            )));
        }

        let total = labels.len() as f64;
        let class_log_prior = class_count.map(|count| (count as f64 / total).ln());

        let params = match self.config.kind {
            NaiveBayesKind::Multinomial => self.estimate_multinomial(vectors, labels, n_features)?,
            NaiveBayesKind::Gaussian => self.estimate_gaussian(vectors, labels, &class_count, n_features),
        };

        debug!(
            "Trained {:?} Naive Bayes: {} genuine, {} fake, {} features",
            self.config.kind,
            class_count[Label::Genuine.index()],
            class_count[Label::Fake.index()],
            n_features
        );

        self.model = Some(NaiveBayesModel {
            class_count,
            class_log_prior,
            n_features,
            params,
        });
        Ok(())
    }

    fn estimate_multinomial(
        &self,
        vectors: &[FeatureVector],
        labels: &[Label],
        n_features: usize,
    ) -> Result<LikelihoodParams> {
        if vectors
            .iter()
            .any(|v| v.values().iter().any(|&value| value < 0.0))
        {
            return Err(VeracityError::invalid_input(
                "multinomial Naive Bayes requires non-negative features",
            ));
        }

        let mut feature_count = [vec![0.0; n_features], vec![0.0; n_features]];
        for (vector, label) in vectors.iter().zip(labels) {
            let counts = &mut feature_count[label.index()];
            for (j, value) in vector.nonzero() {
                counts[j] += value;
            }
        }

        let alpha = self.config.alpha;
        let feature_log_prob: [Vec<f64>; NUM_CLASSES] = feature_count.map(|counts| {
            let denominator = (counts.iter().sum::<f64>() + alpha * n_features as f64).ln();
            counts
                .iter()
                .map(|count| (count + alpha).ln() - denominator)
                .collect()
        });

        Ok(LikelihoodParams::Multinomial { feature_log_prob })
    }

    fn estimate_gaussian(
        &self,
        vectors: &[FeatureVector],
        labels: &[Label],
        class_count: &[usize; NUM_CLASSES],
        n_features: usize,
    ) -> LikelihoodParams {
        let mut means = [vec![0.0; n_features], vec![0.0; n_features]];
        for (vector, label) in vectors.iter().zip(labels) {
            for (j, value) in vector.values().iter().enumerate() {
                means[label.index()][j] += value;
            }
        }
        for (class, mean) in means.iter_mut().enumerate() {
            let count = class_count[class] as f64;
            mean.iter_mut().for_each(|m| *m /= count);
        }

        let mut variances = [vec![0.0; n_features], vec![0.0; n_features]];
        for (vector, label) in vectors.iter().zip(labels) {
            let class = label.index();
            for (j, value) in vector.values().iter().enumerate() {
                let diff = value - means[class][j];
                variances[class][j] += diff * diff;
            }
        }
        for (class, var) in variances.iter_mut().enumerate() {
            let count = class_count[class] as f64;
            var.iter_mut().for_each(|v| *v /= count);
        }

        let epsilon = (self.config.var_smoothing * max_feature_variance(vectors, n_features))
            .max(MIN_VARIANCE);
        for var in variances.iter_mut() {
            var.iter_mut().for_each(|v| *v += epsilon);
        }

        LikelihoodParams::Gaussian { means, variances }
    }

    /// Predict the class of a feature vector.
    pub fn predict(&self, x: &FeatureVector) -> Result<Label> {
        let jll = self.joint_log_likelihood(x)?;
        if jll[Label::Fake.index()] > jll[Label::Genuine.index()] {
            Ok(Label::Fake)
        } else {
            Ok(Label::Genuine)
        }
    }

    /// Normalized log posterior of each class, indexed by [`Label::index`].
    pub fn predict_log_proba(&self, x: &FeatureVector) -> Result<[f64; NUM_CLASSES]> {
        let jll = self.joint_log_likelihood(x)?;
        let max = jll.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let log_sum = max + jll.iter().map(|score| (score - max).exp()).sum::<f64>().ln();
        Ok(jll.map(|score| score - log_sum))
    }

    /// Posterior probability of each class, indexed by [`Label::index`].
    pub fn predict_proba(&self, x: &FeatureVector) -> Result<[f64; NUM_CLASSES]> {
        Ok(self.predict_log_proba(x)?.map(f64::exp))
    }

    fn joint_log_likelihood(&self, x: &FeatureVector) -> Result<[f64; NUM_CLASSES]> {
        let model = self.model.as_ref().ok_or_else(|| {
            VeracityError::not_ready("classifier must be trained before predict")
        })?;
        if x.len() != model.n_features {
            return Err(VeracityError::invalid_input(format!(
                "feature vector has {} features but the model was trained on {}",
                x.len(),
                model.n_features
            )));
        }
        Ok(model.joint_log_likelihood(x))
    }
}

fn max_feature_variance(vectors: &[FeatureVector], n_features: usize) -> f64 {
    let n = vectors.len() as f64;
    (0..n_features)
        .map(|j| {
            let mean = vectors.iter().map(|v| v.values()[j]).sum::<f64>() / n;
            vectors
                .iter()
                .map(|v| {
                    let diff = v.values()[j] - mean;
                    diff * diff
                })
                .sum::<f64>()
                / n
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fv(values: &[f64]) -> FeatureVector {
        FeatureVector::from(values.to_vec())
    }

    fn gaussian() -> NaiveBayesClassifier {
        NaiveBayesClassifier::new(NaiveBayesConfig {
            kind: NaiveBayesKind::Gaussian,
            ..NaiveBayesConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_multinomial_predict() {
        let mut classifier = NaiveBayesClassifier::default();
        classifier
            .fit(
                &[fv(&[2.0, 0.0]), fv(&[0.0, 2.0])],
                &[Label::Genuine, Label::Fake],
            )
            .unwrap();

        assert_eq!(classifier.predict(&fv(&[1.0, 0.0])).unwrap(), Label::Genuine);
        assert_eq!(classifier.predict(&fv(&[0.0, 1.0])).unwrap(), Label::Fake);
        assert_eq!(classifier.predict(&fv(&[1.0, 3.0])).unwrap(), Label::Fake);
    }

    #[test]
    fn test_multinomial_parameters() {
        let mut classifier = NaiveBayesClassifier::default();
        classifier
            .fit(
                &[fv(&[1.0, 0.0]), fv(&[0.0, 1.0]), fv(&[0.0, 3.0])],
                &[Label::Genuine, Label::Fake, Label::Fake],
            )
            .unwrap();

        let model = classifier.model().unwrap();
        assert_eq!(model.class_count(Label::Fake), 2);
        assert!((model.class_prior(Label::Genuine) - 1.0 / 3.0).abs() < 1e-12);
        assert!((model.class_prior(Label::Fake) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(model.kind(), NaiveBayesKind::Multinomial);

        match model.params() {
            LikelihoodParams::Multinomial { feature_log_prob } => {
                // genuine: (1 + 1) / (1 + 2), (0 + 1) / (1 + 2)
                let genuine = &feature_log_prob[Label::Genuine.index()];
                assert!((genuine[0].exp() - 2.0 / 3.0).abs() < 1e-12);
                assert!((genuine[1].exp() - 1.0 / 3.0).abs() < 1e-12);
                // fake: (0 + 1) / (4 + 2), (4 + 1) / (4 + 2)
                let fake = &feature_log_prob[Label::Fake.index()];
                assert!((fake[0].exp() - 1.0 / 6.0).abs() < 1e-12);
                assert!((fake[1].exp() - 5.0 / 6.0).abs() < 1e-12);
            }
            other => panic!("unexpected parameters {other:?}"),
        }
    }

    #[test]
    fn test_tie_favours_genuine() {
        let mut classifier = NaiveBayesClassifier::default();
        classifier
            .fit(
                &[fv(&[1.0, 0.0]), fv(&[0.0, 1.0])],
                &[Label::Genuine, Label::Fake],
            )
            .unwrap();

        assert_eq!(classifier.predict(&fv(&[0.0, 0.0])).unwrap(), Label::Genuine);
        assert_eq!(classifier.predict(&fv(&[1.0, 1.0])).unwrap(), Label::Genuine);
    }

    #[test]
    fn test_predict_proba_sums_to_one() {
        let mut classifier = NaiveBayesClassifier::default();
        classifier
            .fit(
                &[fv(&[3.0, 0.0, 1.0]), fv(&[0.0, 2.0, 1.0])],
                &[Label::Genuine, Label::Fake],
            )
            .unwrap();

        let proba = classifier.predict_proba(&fv(&[1.0, 0.0, 0.5])).unwrap();
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(proba[Label::Genuine.index()] > proba[Label::Fake.index()]);

        let log_proba = classifier.predict_log_proba(&fv(&[1.0, 0.0, 0.5])).unwrap();
        assert!(log_proba.iter().all(|p| *p <= 0.0));
    }

    #[test]
    fn test_gaussian_predict() {
        let mut classifier = gaussian();
        classifier
            .fit(
                &[
                    fv(&[1.0, 0.0]),
                    fv(&[1.2, 0.1]),
                    fv(&[0.0, 1.0]),
                    fv(&[0.1, 1.1]),
                ],
                &[Label::Genuine, Label::Genuine, Label::Fake, Label::Fake],
            )
            .unwrap();

        assert_eq!(classifier.predict(&fv(&[1.1, 0.05])).unwrap(), Label::Genuine);
        assert_eq!(classifier.predict(&fv(&[0.05, 1.05])).unwrap(), Label::Fake);

        match classifier.model().unwrap().params() {
            LikelihoodParams::Gaussian { means, variances } => {
                let genuine = Label::Genuine.index();
                assert!((means[genuine][0] - 1.1).abs() < 1e-12);
                assert!((means[genuine][1] - 0.05).abs() < 1e-12);
                assert!(variances[genuine].iter().all(|v| *v > 0.0));
            }
            other => panic!("unexpected parameters {other:?}"),
        }
    }

    #[test]
    fn test_gaussian_single_example_per_class() {
        let mut classifier = gaussian();
        classifier
            .fit(
                &[fv(&[1.0, 0.0]), fv(&[0.0, 1.0])],
                &[Label::Genuine, Label::Fake],
            )
            .unwrap();

        assert_eq!(classifier.predict(&fv(&[0.9, 0.0])).unwrap(), Label::Genuine);
        assert_eq!(classifier.predict(&fv(&[0.0, 0.9])).unwrap(), Label::Fake);
    }

    #[test]
    fn test_single_class_is_invalid_input() {
        let mut classifier = NaiveBayesClassifier::default();
        let err = classifier
            .fit(
                &[fv(&[1.0, 0.0]), fv(&[0.0, 1.0])],
                &[Label::Genuine, Label::Genuine],
            )
            .unwrap_err();

        assert!(err.is_invalid_input());
        assert!(!classifier.is_fitted());
    }

    #[test]
    fn test_invalid_training_data() {
        let mut classifier = NaiveBayesClassifier::default();

        assert!(classifier.fit(&[], &[]).unwrap_err().is_invalid_input());
        assert!(
            classifier
                .fit(&[fv(&[1.0])], &[Label::Genuine, Label::Fake])
                .unwrap_err()
                .is_invalid_input()
        );
        assert!(
            classifier
                .fit(
                    &[fv(&[1.0, 0.0]), fv(&[1.0])],
                    &[Label::Genuine, Label::Fake]
                )
                .unwrap_err()
                .is_invalid_input()
        );
        assert!(
            classifier
                .fit(
                    &[fv(&[-1.0, 0.0]), fv(&[1.0, 0.0])],
                    &[Label::Genuine, Label::Fake]
                )
                .unwrap_err()
                .is_invalid_input()
        );
        assert!(
            classifier
                .fit(
                    &[fv(&[f64::NAN, 0.0]), fv(&[1.0, 0.0])],
                    &[Label::Genuine, Label::Fake]
                )
                .unwrap_err()
                .is_invalid_input()
        );
        assert!(!classifier.is_fitted());
    }

    #[test]
    fn test_failed_refit_keeps_previous_model() {
        let mut classifier = NaiveBayesClassifier::default();
        classifier
            .fit(
                &[fv(&[1.0, 0.0]), fv(&[0.0, 1.0])],
                &[Label::Genuine, Label::Fake],
            )
            .unwrap();
        let before = classifier.model().cloned();

        assert!(
            classifier
                .fit(&[fv(&[1.0, 0.0])], &[Label::Fake])
                .is_err()
        );
        assert_eq!(classifier.model().cloned(), before);
    }

    #[test]
    fn test_predict_before_fit_is_not_ready() {
        let classifier = NaiveBayesClassifier::default();
        let err = classifier.predict(&fv(&[1.0])).unwrap_err();
        assert!(err.is_not_ready());
        assert!(classifier.predict_proba(&fv(&[1.0])).unwrap_err().is_not_ready());
    }

    #[test]
    fn test_dimension_mismatch_is_invalid_input() {
        let mut classifier = NaiveBayesClassifier::default();
        classifier
            .fit(
                &[fv(&[1.0, 0.0]), fv(&[0.0, 1.0])],
                &[Label::Genuine, Label::Fake],
            )
            .unwrap();

        let err = classifier.predict(&fv(&[1.0, 0.0, 0.0])).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_validate_rejects_inconsistent_model() {
        let mut classifier = NaiveBayesClassifier::default();
        classifier
            .fit(
                &[fv(&[1.0, 0.0]), fv(&[0.0, 1.0])],
                &[Label::Genuine, Label::Fake],
            )
            .unwrap();
        assert!(classifier.validate().is_ok());

        let mut short_table = classifier.clone();
        if let Some(model) = short_table.model.as_mut() {
            model.n_features = 3;
        }
        assert!(short_table.validate().unwrap_err().is_invalid_input());

        let mut wrong_kind = classifier.clone();
        wrong_kind.config.kind = NaiveBayesKind::Gaussian;
        assert!(wrong_kind.validate().unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_config_validation() {
        for alpha in [0.0, -1.0, f64::NAN] {
            let config = NaiveBayesConfig {
                alpha,
                ..NaiveBayesConfig::default()
            };
            assert!(NaiveBayesClassifier::new(config).unwrap_err().is_invalid_input());
        }

        let config = NaiveBayesConfig {
            var_smoothing: -1e-9,
            ..NaiveBayesConfig::default()
        };
        assert!(NaiveBayesClassifier::new(config).unwrap_err().is_invalid_input());
    }
}
