//! CLI `mergeflow`: valida documentos de merge y resuelve parámetros.
//!
//! Códigos de salida: 0 ok, 2 uso, 3 carga/parseo, 4 configuración inválida,
//! 5 fallo de resolución.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::{debug, info};
use serde_json::json;

use merge_config::ModelReference;
use merge_core::ScalarValue;
use mergeflow_rust::config::CONFIG;
use mergeflow_rust::loader::load_configuration;
use mergeflow_rust::plan::{build_plan, context_reader, select_slice, PlanOptions};
use mergeflow_rust::AppError;

#[derive(Parser, Debug)]
#[command(name = "mergeflow", version, about = "Merge configuration validation and parameter resolution")]
struct Cli {
    /// Verbosidad (-v info, -vv debug, -vvv trace); por defecto MERGEFLOW_LOG.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Valida el documento e imprime fingerprint y modelos referenciados.
    Validate {
        config: PathBuf,
    },
    /// Resuelve un parámetro para un tensor en la posición `t`.
    Resolve {
        config: PathBuf,
        #[arg(long)]
        param: String,
        #[arg(long)]
        tensor: String,
        #[arg(long, default_value_t = 0.0)]
        t: f64,
        /// Modelo fuente (`path` o `path+lora`).
        #[arg(long)]
        model: Option<String>,
        /// Índice del slice de salida activo.
        #[arg(long)]
        slice: Option<usize>,
        /// Valor por defecto si ningún scope declara el parámetro.
        #[arg(long)]
        default: Option<String>,
        #[arg(long)]
        required: bool,
    },
    /// Resuelve un parámetro en cada capa de cada slice y fuente.
    Plan {
        config: PathBuf,
        #[arg(long)]
        param: String,
        /// Nombre de tensor; `{layer}` se sustituye por la capa de salida.
        #[arg(long)]
        tensor: String,
        /// Posición usada en modo por modelos.
        #[arg(long, default_value_t = 0.0)]
        t: f64,
    },
}

fn init_logger(verbose: u8) {
    let filter = match verbose {
        0 => CONFIG.log_filter.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    env_logger::Builder::new().parse_filters(&filter).init();
}

fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Validate { config } => {
            let cfg = load_configuration(&config)?;
            cfg.validate()?;
            let models: Vec<String> = cfg.referenced_models().iter().map(ToString::to_string).collect();
            let out = json!({
                "merge_method": &cfg.merge_method,
                "fingerprint": cfg.fingerprint()?,
                "slices": cfg.output_slices().len(),
                "models": cfg.input_models().len(),
                "referenced_models": models,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Command::Resolve { config, param, tensor, t, model, slice, default, required } => {
            let cfg = load_configuration(&config)?;
            cfg.validate()?;
            let model = model.as_deref().map(ModelReference::parse).transpose()?;
            let model_sources = cfg.model_sources();
            let reader = context_reader(&cfg, select_slice(&cfg, slice)?, &model_sources, &tensor, t);
            let default = default.as_deref().map(ScalarValue::parse_literal);
            let value = reader.parameter(&param, model.as_ref(), default, required)?;
            let scope = reader.declaring_scope(&param, model.as_ref());
            debug!("resolved {param} for {tensor} at t={t}: scope={scope:?}");
            let out = json!({
                "parameter": param,
                "tensor": tensor,
                "t": t,
                "model": model.as_ref().map(ToString::to_string),
                "slice": slice,
                "scope": scope,
                "value": value,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Command::Plan { config, param, tensor, t } => {
            let cfg = load_configuration(&config)?;
            let options = PlanOptions { parameter: param,
                                        tensor_template: tensor,
                                        t,
                                        threads: CONFIG.plan_threads };
            let plan = build_plan(&cfg, &options)?;
            info!("plan {} generated with {} rows", plan.run_id, plan.rows.len());
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    if let Err(e) = run(cli.command) {
        eprintln!("[mergeflow] {e}");
        std::process::exit(e.exit_code());
    }
}
