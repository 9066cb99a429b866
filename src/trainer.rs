//! Streams the observations through the model, one line at a time.
//!
//! Rated lines are first predicted (progressive validation) and then fitted.
//! Lines without a rating are queries, their predictions are written out as JSON lines.

use std::io::{BufRead, Write};

use crate::helpers::periodic::Periodic;
use crate::helpers::tracing::format_elapsed;
use crate::prelude::*;
use crate::reco::model::OnlineMf;

pub use self::entry::{Entry, EntityId, Prediction};
pub use self::metrics::Metrics;

pub mod entry;
pub mod metrics;

pub struct RunOptions {
    /// Metrics logging interval.
    pub log_interval: StdDuration,

    /// Also write out the predictions made for the rated lines.
    pub echo_predictions: bool,
}

#[instrument(skip_all)]
pub fn run<R: BufRead, W: Write>(
    model: &mut OnlineMf<EntityId>,
    reader: R,
    mut writer: W,
    options: &RunOptions,
) -> Result<Metrics> {
    let start_instant = Instant::now();
    let mut periodic = Periodic::new(options.log_interval);
    let mut metrics = Metrics::default();
    let mut n_logged_entries = 0;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("failed to read line #{}", line_number))?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: Entry = serde_json::from_str(&line)
            .with_context(|| format!("failed to parse line #{}", line_number))?;

        let prediction = model
            .predict(&entry.user, &entry.item)
            .with_context(|| format!("failed to predict line #{}", line_number))?;
        match entry.rating {
            Some(rating) => {
                model
                    .fit_one(&entry.user, &entry.item, rating)
                    .with_context(|| format!("failed to fit line #{}", line_number))?;
                metrics.push_residual(rating - prediction);
                if options.echo_predictions {
                    write_prediction(&mut writer, &entry, prediction)?;
                }
            }
            None => {
                metrics.n_queries += 1;
                write_prediction(&mut writer, &entry, prediction)?;
            }
        }

        if let Some(elapsed) = periodic.poll() {
            let n_entries = metrics.n_entries() - n_logged_entries;
            n_logged_entries = metrics.n_entries();
            debug!(rate = format!("{:.0}/s", n_entries as f64 / elapsed.as_secs_f64()).as_str());
            metrics.log();
        }
    }
    writer.flush().context("failed to flush the predictions")?;

    info!(
        elapsed = format_elapsed(start_instant).as_str(),
        n_users = model.user_latents().len(),
        n_items = model.item_latents().len(),
        "finished",
    );
    metrics.log();
    Ok(metrics)
}

fn write_prediction<W: Write>(writer: &mut W, entry: &Entry, prediction: f64) -> Result {
    let prediction = Prediction {
        user: &entry.user,
        item: &entry.item,
        prediction,
        rating: entry.rating,
    };
    serde_json::to_writer(&mut *writer, &prediction)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::optim::OptimizerConfig;

    const INPUT: &str = r#"{"user": "Alice", "item": "Superman", "rating": 8}
{"user": "Alice", "item": "Terminator", "rating": 9}

{"user": "Bob", "item": "Superman", "rating": 8}
{"user": "Bob", "item": "Terminator"}
{"user": 42, "item": 1}
"#;

    fn options(echo_predictions: bool) -> RunOptions {
        RunOptions {
            log_interval: StdDuration::from_secs(3600),
            echo_predictions,
        }
    }

    fn model() -> Result<OnlineMf<EntityId>> {
        OnlineMf::builder()
            .optimizer(OptimizerConfig::sgd(0.1))
            .random_state(11)
            .build()
    }

    #[test]
    fn run_ok() -> Result {
        let mut model = model()?;
        let mut output = Vec::new();
        let metrics = run(&mut model, Cursor::new(INPUT), &mut output, &options(false))?;

        assert_eq!(metrics.n_observations, 3);
        assert_eq!(metrics.n_queries, 2);
        assert_eq!(metrics.n_entries(), 5);
        assert!(metrics.mae.average() > 0.0);
        assert_eq!(model.user_latents().len(), 3);
        assert_eq!(model.item_latents().len(), 3);

        let lines = String::from_utf8(output)?;
        let lines = lines.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        let prediction: serde_json::Value = serde_json::from_str(lines[0])?;
        assert_eq!(prediction["user"], "Bob");
        assert_eq!(prediction["item"], "Terminator");
        assert!(prediction["prediction"].is_f64());
        assert!(prediction.get("rating").is_none());
        Ok(())
    }

    #[test]
    fn run_echo_predictions_ok() -> Result {
        let mut output = Vec::new();
        run(&mut model()?, Cursor::new(INPUT), &mut output, &options(true))?;
        assert_eq!(String::from_utf8(output)?.lines().count(), 5);
        Ok(())
    }

    #[test]
    fn run_matches_direct_fit_ok() -> Result {
        let mut streamed = model()?;
        run(&mut streamed, Cursor::new(INPUT), std::io::sink(), &options(false))?;

        let mut direct = model()?;
        let alice = EntityId::from("Alice");
        let bob = EntityId::from("Bob");
        let superman = EntityId::from("Superman");
        let terminator = EntityId::from("Terminator");
        direct
            .fit_one(&alice, &superman, 8.0)?
            .fit_one(&alice, &terminator, 9.0)?
            .fit_one(&bob, &superman, 8.0)?;

        assert_eq!(
            streamed.predict(&bob, &terminator)?,
            direct.predict(&bob, &terminator)?,
        );
        Ok(())
    }

    #[test]
    fn run_malformed_line_fails() -> Result {
        let input = "{\"user\": 1, \"item\": 2, \"rating\": 1}\nnot a json\n";
        let error = run(&mut model()?, Cursor::new(input), std::io::sink(), &options(false))
            .err()
            .ok_or_else(|| anyhow!("expected an error"))?;
        assert!(format!("{:#}", error).contains("line #2"));
        Ok(())
    }
}
