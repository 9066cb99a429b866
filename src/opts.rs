//! CLI options.

use clap::{Args, Parser, Subcommand as ClapSubcommand, ValueEnum};
use online_mf::initializers::{Constant, Normal, Uniform};
use online_mf::loss::{Absolute, Cauchy, Squared};
use online_mf::optim::{LearningRate, OptimizerConfig};
use online_mf::prelude::*;
use online_mf::trainer::{EntityId, RunOptions};
use online_mf::OnlineMf;

pub mod parsers;

#[derive(Parser)]
#[command(version, about, propagate_version = true)]
pub struct Opts {
    /// Sentry DSN
    #[arg(short, long, env = "SENTRY_DSN")]
    pub sentry_dsn: Option<String>,

    /// Performance traces sample rate for Sentry
    #[arg(long, default_value = "0", value_parser = parsers::sample_rate)]
    pub traces_sample_rate: f32,

    #[command(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(ClapSubcommand)]
pub enum Subcommand {
    Fit(FitOpts),
}

/// Streams JSON-lines observations from stdin through the model
#[derive(Args)]
pub struct FitOpts {
    #[command(flatten)]
    pub model: ModelOpts,

    /// Progressive validation metrics logging interval
    #[arg(long, default_value = "10s", value_parser = humantime::parse_duration)]
    pub log_interval: StdDuration,

    /// Also print the predictions made for the rated observations
    #[arg(long)]
    pub echo_predictions: bool,
}

impl FitOpts {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            log_interval: self.log_interval,
            echo_predictions: self.echo_predictions,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum OptimizerKind {
    Sgd,
    Momentum,
    AdaGrad,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LossKind {
    Squared,
    Absolute,
    Cauchy,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum InitializerKind {
    Normal,
    Uniform,
    Constant,
}

/// Matrix factorization options.
#[derive(Args)]
pub struct ModelOpts {
    /// Latent factor count
    #[arg(long, default_value = "10")]
    pub n_factors: usize,

    /// Sequential optimizer, one instance per side
    #[arg(long, value_enum, default_value_t = OptimizerKind::Sgd)]
    pub optimizer: OptimizerKind,

    /// Initial learning rate
    #[arg(long = "lr", default_value = "0.01", value_parser = parsers::positive_f64)]
    pub learning_rate: f64,

    /// Learning rate decay per optimizer step
    #[arg(long = "lr-decay", default_value = "0", value_parser = parsers::non_negative_f64)]
    pub learning_rate_decay: f64,

    /// Minimal learning rate
    #[arg(long = "min-lr", default_value = "0", value_parser = parsers::non_negative_f64)]
    pub min_learning_rate: f64,

    /// Momentum coefficient
    #[arg(long, default_value = "0.9", value_parser = parsers::unit_interval)]
    pub rho: f64,

    /// AdaGrad smoothing term
    #[arg(long, default_value = "1e-8", value_parser = parsers::positive_f64)]
    pub epsilon: f64,

    /// Loss function
    #[arg(long, value_enum, default_value_t = LossKind::Squared)]
    pub loss: LossKind,

    /// L2 regularization parameter
    #[arg(long, default_value = "0", value_parser = parsers::non_negative_f64)]
    pub l2: f64,

    /// Absolute bound of the loss gradient
    #[arg(long, default_value = "1e12", value_parser = parsers::positive_f64)]
    pub clip_gradient: f64,

    /// Latent factors initialization scheme
    #[arg(long, value_enum, default_value_t = InitializerKind::Normal)]
    pub initializer: InitializerKind,

    /// Normal initializer mean, or the constant initializer value
    #[arg(long, default_value = "0", value_parser = parsers::finite_f64)]
    pub init_mean: f64,

    /// Normal initializer standard deviation
    #[arg(long, default_value = "0.1", value_parser = parsers::positive_f64)]
    pub init_std: f64,

    /// Uniform initializer lower bound
    #[arg(long, default_value = "-0.1", value_parser = parsers::finite_f64, allow_hyphen_values = true)]
    pub init_low: f64,

    /// Uniform initializer upper bound
    #[arg(long, default_value = "0.1", value_parser = parsers::finite_f64, allow_hyphen_values = true)]
    pub init_high: f64,

    /// Initializer random seed
    #[arg(long, env = "ONLINE_MF_SEED")]
    pub seed: Option<u64>,
}

impl ModelOpts {
    pub fn optimizer_config(&self) -> OptimizerConfig {
        let learning_rate = LearningRate::new(
            self.learning_rate,
            self.learning_rate_decay,
            self.min_learning_rate,
        );
        match self.optimizer {
            OptimizerKind::Sgd => OptimizerConfig::sgd(learning_rate),
            OptimizerKind::Momentum => OptimizerConfig::momentum(learning_rate, self.rho),
            OptimizerKind::AdaGrad => OptimizerConfig::ada_grad(learning_rate, self.epsilon),
        }
    }

    pub fn build(&self) -> Result<OnlineMf<EntityId>> {
        let builder = OnlineMf::builder()
            .n_factors(self.n_factors)
            .optimizer(self.optimizer_config())
            .l2(self.l2)
            .clip_gradient(self.clip_gradient);
        let builder = match self.loss {
            LossKind::Squared => builder.loss(Squared),
            LossKind::Absolute => builder.loss(Absolute),
            LossKind::Cauchy => builder.loss(Cauchy::default()),
        };
        let builder = match self.initializer {
            InitializerKind::Normal => {
                builder.initializer(Normal::new(self.init_mean, self.init_std, self.seed)?)
            }
            InitializerKind::Uniform => {
                builder.initializer(Uniform::new(self.init_low, self.init_high, self.seed)?)
            }
            InitializerKind::Constant => builder.initializer(Constant {
                value: self.init_mean,
            }),
        };
        builder.build()
    }
}
