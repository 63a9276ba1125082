use std::process::ExitCode;
use std::sync::Arc;

use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, error, info, warn};

// 从 lib.rs 导入模块
use rust_hwsystem_grading::config::AppConfig;
use rust_hwsystem_grading::errors::{GradingError, Result};
use rust_hwsystem_grading::models::{Gradeable, NewGradeable, User};
use rust_hwsystem_grading::services::GradingOrder;
use rust_hwsystem_grading::storage::{
    CourseDirectory, CoursePathProvider, FileReader, JsonFileReader, RosterSectionResolver,
    SubmissionDirectoryVersions,
};
use rust_hwsystem_grading::utils::format_course_date;

fn main() -> ExitCode {
    dotenv().ok();

    let start = chrono::Utc::now();

    // 初始化配置
    setup_panic!();
    if let Err(e) = AppConfig::init() {
        eprintln!("Failed to initialize configuration: {e}");
        return ExitCode::FAILURE;
    }
    let config = AppConfig::get();

    // 初始化日志
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    warn!(
        "Starting {}...
        Project: {}
        Version: {}
        Authors: {}",
        config.app.system_name,
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS")
    );

    let result = run(config);

    debug!(
        "Finished in {} ms",
        chrono::Utc::now()
            .signed_duration_since(start)
            .num_milliseconds()
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e.format_simple());
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig) -> Result<()> {
    let grading = &config.grading;
    if grading.gradeable_id.is_empty() {
        return Err(GradingError::config("未配置作业 ID (GRADEABLE_ID)"));
    }
    if grading.grader_id.is_empty() {
        return Err(GradingError::config("未配置评分人 ID (GRADER_ID)"));
    }

    let course = CourseDirectory::from_config(&config.course)?;
    let files = JsonFileReader;

    // 作业表单
    let form_path = course.gradeable_form_path(&grading.gradeable_id);
    let request: NewGradeable = serde_json::from_value(files.read_json(&form_path)?)?;
    let gradeable = Arc::new(Gradeable::create(request, &course, &files)?);

    info!(
        "Gradeable {} ({}): type {}, section key {}",
        gradeable.id(),
        gradeable.title(),
        gradeable.gradeable_type(),
        gradeable.section_key()
    );
    if let Some(due) = gradeable.dates().submission_due_date {
        info!(
            "Due {} with {} late days",
            format_course_date(&due),
            gradeable.late_days()
        );
    }

    let order = GradingOrder::new(
        Arc::clone(&gradeable),
        User::new(grading.grader_id.clone()),
        grading.all_sections,
        &RosterSectionResolver::new(course.clone()),
        &SubmissionDirectoryVersions::new(course),
    )?;

    info!(
        "Grading order: {} sections, {} submitters, {} with submissions",
        order.sections().len(),
        order.len(),
        order.submission_count()
    );

    for submitter in order.submitters() {
        info!(
            "[{}] {} submission={} prev={} next={}",
            order.section_of(submitter.id()).unwrap_or("-"),
            submitter.id(),
            order.has_submission(submitter),
            order.prev_submitter(submitter).map_or("-", |s| s.id()),
            order.next_submitter(submitter).map_or("-", |s| s.id())
        );
    }

    Ok(())
}
