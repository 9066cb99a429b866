use std::io::{self, BufWriter};

use clap::Parser;
use online_mf::prelude::*;
use online_mf::trainer;

use crate::opts::{FitOpts, Opts, Subcommand};

mod opts;

fn main() -> Result {
    let opts = Opts::parse();
    let _sentry_guard =
        online_mf::helpers::tracing::init(opts.sentry_dsn.clone(), opts.traces_sample_rate)?;
    run_subcommand(opts).inspect_err(|error| {
        sentry::integrations::anyhow::capture_anyhow(error);
    })
}

fn run_subcommand(opts: Opts) -> Result {
    match opts.subcommand {
        Subcommand::Fit(opts) => fit(opts),
    }
}

#[instrument(skip_all)]
fn fit(opts: FitOpts) -> Result {
    sentry::configure_scope(|scope| scope.set_tag("app", "fit"));

    let mut model = opts.model.build()?;
    info!(
        n_factors = model.n_factors(),
        optimizer = ?opts.model.optimizer_config(),
        loss = ?opts.model.loss,
        l2 = model.l2(),
        "running…",
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    trainer::run(&mut model, stdin.lock(), BufWriter::new(stdout.lock()), &opts.run_options())?;
    Ok(())
}
