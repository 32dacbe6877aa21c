//! precept 命令行：按日/按月查询戒期，或对单条戒期文本做解析

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use precept_engine::{
    AlmanacCache, AlmanacLoader, ConfigManager, DayAnnotations, MonthSummary, PreceptEngine,
    RuleTextParser, SeverityPolicy, classify_severity,
};

#[derive(Parser, Debug)]
#[command(name = "precept", version, about = "农历戒期查询")]
struct Cli {
    /// 历书文件（JSON，或 .mp 后缀的 MessagePack 缓存）
    #[arg(global = true, long)]
    almanac: Option<PathBuf>,

    /// 严格模式：日期超出历书范围时直接报错
    #[arg(global = true, long, default_value_t = false)]
    strict: bool,

    /// 显式等级与文本推导等级冲突时的取舍
    #[arg(global = true, long, value_enum, default_value_t = PolicyArg::Explicit)]
    policy: PolicyArg,

    /// 加载后将历书另存为 MessagePack 缓存
    #[arg(global = true, long)]
    save_cache: Option<PathBuf>,

    /// 以纯文本而非 JSON 输出
    #[arg(global = true, long, default_value_t = false)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Explicit,
    Derive,
}

impl From<PolicyArg> for SeverityPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Explicit => SeverityPolicy::ExplicitOverride,
            PolicyArg::Derive => SeverityPolicy::AlwaysDerive,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 查询某日（YYYY-MM-DD）的全部戒期
    Day { date: NaiveDate },
    /// 查询公历某月的逐日汇总
    Month { year: i32, month: u32 },
    /// 解析一条戒期文本
    Classify { text: String },
}

#[derive(Serialize)]
struct ClassifyOutput {
    derived_severity: precept_engine::SeverityLevel,
    annotation: precept_engine::RuleAnnotation,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let policy = SeverityPolicy::from(cli.policy);

    match &cli.command {
        Commands::Classify { text } => {
            let annotation = RuleTextParser::parse_text(text, policy);
            if cli.plain {
                println!("{}", annotation.description());
                return Ok(());
            }
            print_json(&ClassifyOutput {
                derived_severity: classify_severity(&annotation.punishment),
                annotation,
            })
        }
        Commands::Day { date } => {
            let day = build_engine(&cli, policy).await?.annotate_day(*date)?;
            if cli.plain {
                print_day(&day);
                return Ok(());
            }
            print_json(&day)
        }
        Commands::Month { year, month } => {
            let summary = build_engine(&cli, policy).await?.month_summary(*year, *month)?;
            if cli.plain {
                print_month(&summary);
                return Ok(());
            }
            print_json(&summary)
        }
    }
}

async fn build_engine(cli: &Cli, policy: SeverityPolicy) -> Result<PreceptEngine> {
    let Some(almanac_path) = cli.almanac.as_deref() else {
        bail!("查询日期需要通过 --almanac 指定历书文件");
    };
    let provider = AlmanacLoader::load(almanac_path)
        .await
        .with_context(|| format!("加载历书失败：{}", almanac_path.display()))?;
    if let Some((start, end)) = provider.date_range() {
        info!("历书覆盖范围：{} 至 {}", start, end);
    }
    if let Some(cache_path) = cli.save_cache.as_deref() {
        AlmanacCache::save(cache_path, provider.data())
            .await
            .with_context(|| format!("保存历书缓存失败：{}", cache_path.display()))?;
        info!("历书缓存已保存：{}", cache_path.display());
    }

    let config = ConfigManager::custom()
        .strict(cli.strict)
        .severity_policy(policy)
        .build();
    Ok(PreceptEngine::new(Arc::new(provider), config)?)
}

fn print_day(day: &DayAnnotations) {
    match &day.calendar {
        Some(calendar) => println!(
            "{}（农历{}，{}）最高等级：{}",
            day.date, calendar.lunar, calendar.gan_zhi, day.max_severity
        ),
        None => println!("{} 最高等级：{}", day.date, day.max_severity),
    }
    for annotation in &day.annotations {
        println!("\n{}", annotation.description());
    }
}

fn print_month(summary: &MonthSummary) {
    for day in &summary.days {
        let lines: Vec<String> = day.annotations.iter().map(ToString::to_string).collect();
        println!("{} {}：{}", day.date, day.max_severity, lines.join("；"));
    }
    let stats = &summary.stats;
    println!(
        "\n{}年{}月：大戒{}日、中戒{}日、宜戒{}日、安全{}日",
        summary.year, summary.month, stats.major, stats.moderate, stats.minor, stats.safe
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
