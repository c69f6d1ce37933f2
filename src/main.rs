//! numlab command line
//!
//! With no mode flag this does nothing and exits successfully.
//!
//! ```text
//! numlab [--env <name>] --madd <a> <b> <c>   print a + b*c
//! numlab [--env <name>] --task <param>       run the placeholder task, print JSON
//! ```

use anyhow::{Context, Result, bail};

use numlab::config::AppConfig;
use numlab::core_types::TaskParam;
use numlab::long_task::LongTask;
use numlab::madd::multiply_add;

// ============================================================
// ARGUMENTS
// ============================================================

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Values following `flag`, if the flag is present.
fn flag_values(flag: &str, count: usize) -> Result<Option<Vec<String>>> {
    let args: Vec<String> = std::env::args().collect();
    let Some(pos) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    let values: Vec<String> = args.iter().skip(pos + 1).take(count).cloned().collect();
    if values.len() != count {
        bail!("{} expects {} value(s), got {}", flag, count, values.len());
    }
    Ok(Some(values))
}

/// Second value is true when the env file was missing and defaults were used.
fn load_config(env: &str) -> Result<(AppConfig, bool)> {
    match AppConfig::load(env) {
        Ok(config) => Ok((config, false)),
        Err(e) if e.is_not_found() => Ok((AppConfig::default(), true)),
        Err(e) => Err(e).with_context(|| format!("loading config for env '{}'", env)),
    }
}

// ============================================================
// MODES
// ============================================================

fn run_madd(values: &[String]) -> Result<()> {
    let mut nums = [0.0f64; 3];
    for (slot, raw) in nums.iter_mut().zip(values) {
        *slot = raw
            .parse()
            .with_context(|| format!("--madd operand '{}' is not a number", raw))?;
    }
    let [a, b, c] = nums;
    let out = multiply_add(a, b, c);
    tracing::debug!(a, b, c, out, "multiply_add");
    println!("{}", out);
    Ok(())
}

fn run_task(config: &AppConfig, raw_param: &str) -> Result<()> {
    let param: TaskParam = raw_param
        .parse()
        .with_context(|| format!("--task param '{}' is not an integer", raw_param))?;
    let task = LongTask::from_config(&config.task)?;
    tracing::info!(
        param,
        duration_secs = task.duration().as_secs_f64(),
        wait = ?task.wait_strategy(),
        "starting task"
    );

    let report = task.run(param, &mut rand::thread_rng());
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

// ============================================================
// MAIN
// ============================================================

fn main() -> Result<()> {
    let madd_args = flag_values("--madd", 3)?;
    let task_args = flag_values("--task", 1)?;
    if madd_args.is_none() && task_args.is_none() {
        return Ok(());
    }

    let env = get_env();
    let (app_config, used_defaults) = load_config(&env)?;
    let _log_guard = numlab::logging::init_logging(&app_config);
    if used_defaults {
        tracing::warn!("config/{}.yaml not found, using defaults", env);
    }

    if let Some(values) = madd_args {
        run_madd(&values)?;
    }
    if let Some(values) = task_args {
        run_task(&app_config, &values[0])?;
    }
    Ok(())
}
