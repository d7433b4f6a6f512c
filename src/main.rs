// ==========================================
// 配置驱动表单构建器 - 命令行入口
// ==========================================
// 用法:
//   form-config-export <命令> [参数...]
//
// 数据库路径见 app::get_default_db_path（可用 FORM_CONFIG_EXPORT_DB_PATH 覆盖）
// 结果以 JSON 写到 stdout，导出文档写入文件，日志写到 stderr
// ==========================================

use anyhow::{bail, Context};
use serde::Serialize;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};

use form_config_export::api::ApiError;
use form_config_export::app::{get_default_db_path, AppState};
use form_config_export::config::config_keys;
use form_config_export::domain::{ConfigurationDraft, ExportArtifact};
use form_config_export::logging;

const USAGE: &str = "\
用法: form-config-export <命令> [参数...]

配置管理:
  list                               列出所有配置
  show <id>                          查看配置
  create <draft.json>                创建配置
  update <id> <draft.json>           整体替换配置
  delete <id>                        删除配置
  scan-template <template.json>      从模板提取字段（<data[\"fieldN\"]> 占位符）
  scan-sample <sample.json>          从扁平 JSON 样例生成字段

提交与导出:
  sample <id>                        生成样例直接提交载荷
  submit <id> <payload.json> [dir]   直接提交并写出单行文档
  record <id> <values.json>          记录一次表单提交
  submissions <id>                   列出提交记录
  export <id> [dir]                  导出全部历史提交
  purge <id>                         清理某配置的提交记录

导出设置:
  settings                           查看导出设置
  settings <key> <value>             修改导出设置";

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(&args) {
        match err.downcast_ref::<ApiError>() {
            Some(api_err) => eprintln!("错误 [{}]: {}", api_err.code(), api_err),
            None => eprintln!("错误: {:#}", err),
        }
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };
    let rest = &args[1..];

    if matches!(command.as_str(), "help" | "-h" | "--help") {
        println!("{}", USAGE);
        return Ok(());
    }

    let db_path = get_default_db_path();
    tracing::debug!("使用数据库: {}", db_path);
    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    match command.as_str() {
        // ===== 配置管理 =====
        "list" => print_json(&state.configuration_api.list_configurations()?),
        "show" => {
            let id = arg(rest, 0, "id")?;
            print_json(&state.configuration_api.get_configuration(id)?)
        }
        "create" => {
            let draft: ConfigurationDraft = read_json(arg(rest, 0, "draft.json")?)?;
            print_json(&state.configuration_api.create_configuration(draft)?)
        }
        "update" => {
            let id = arg(rest, 0, "id")?;
            let draft: ConfigurationDraft = read_json(arg(rest, 1, "draft.json")?)?;
            print_json(&state.configuration_api.update_configuration(id, draft)?)
        }
        "delete" => {
            let id = arg(rest, 0, "id")?;
            print_json(&state.configuration_api.delete_configuration(id)?)
        }
        "scan-template" => {
            let source = read_text(arg(rest, 0, "template.json")?)?;
            print_json(&state.configuration_api.extract_template_fields(&source)?)
        }
        "scan-sample" => {
            let source = read_text(arg(rest, 0, "sample.json")?)?;
            print_json(&state.configuration_api.fields_from_sample(&source)?)
        }

        // ===== 提交与导出 =====
        "sample" => {
            let id = arg(rest, 0, "id")?;
            print_json(&state.submission_api.sample_payload(id)?)
        }
        "submit" => {
            let id = arg(rest, 0, "id")?;
            let payload: Value = read_json(arg(rest, 1, "payload.json")?)?;
            let artifact = state.submission_api.submit_direct(id, &payload)?;
            write_artifact(&artifact, rest.get(2))
        }
        "record" => {
            let id = arg(rest, 0, "id")?;
            let values: Value = read_json(arg(rest, 1, "values.json")?)?;
            print_json(&state.submission_api.record_submission_json(id, &values)?)
        }
        "submissions" => {
            let id = arg(rest, 0, "id")?;
            print_json(&state.submission_api.list_submissions(id)?)
        }
        "export" => {
            let id = arg(rest, 0, "id")?;
            let artifact = state.submission_api.export_submissions(id)?;
            write_artifact(&artifact, rest.get(1))
        }
        "purge" => {
            let id = arg(rest, 0, "id")?;
            let removed = state.submission_api.purge_submissions(id)?;
            println!("removed={}", removed);
            Ok(())
        }

        // ===== 导出设置 =====
        "settings" => match (rest.first(), rest.get(1)) {
            (Some(key), Some(value)) => {
                state
                    .config_manager
                    .set_export_setting(key, value)
                    .map_err(ApiError::from)?;
                println!("{} = {}", key, value);
                Ok(())
            }
            (None, _) => {
                let settings = state
                    .config_manager
                    .export_settings()
                    .map_err(ApiError::from)?;
                println!(
                    "{} = {}",
                    config_keys::DEFAULT_FILENAME_TEMPLATE,
                    settings.default_filename_template
                );
                println!(
                    "{} = {}",
                    config_keys::DIRECT_DELIMITER,
                    settings.direct_delimiter as char
                );
                println!(
                    "{} = {}",
                    config_keys::HISTORY_DELIMITER,
                    settings.history_delimiter as char
                );
                Ok(())
            }
            (Some(key), None) => bail!("缺少参数: {} 的 value", key),
        },

        other => bail!("未知命令: {}\n\n{}", other, USAGE),
    }
}

fn arg<'a>(rest: &'a [String], index: usize, name: &str) -> anyhow::Result<&'a str> {
    rest.get(index)
        .map(String::as_str)
        .with_context(|| format!("缺少参数: <{}>", name))
}

fn read_text(path: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("无法读取文件: {}", path))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let text = read_text(path)?;
    serde_json::from_str(&text).with_context(|| format!("JSON 解析失败: {}", path))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_artifact(artifact: &ExportArtifact, out_dir: Option<&String>) -> anyhow::Result<()> {
    let dir = out_dir.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("无法创建目录: {}", dir.display()))?;

    let name = Path::new(&artifact.filename);
    if !matches!(name.components().collect::<Vec<_>>().as_slice(), [Component::Normal(_)]) {
        bail!("导出文件名不是单一路径片段: {}", artifact.filename);
    }

    let path = dir.join(name);
    std::fs::write(&path, &artifact.content)
        .with_context(|| format!("无法写入文件: {}", path.display()))?;

    tracing::info!(path = %path.display(), bytes = artifact.content.len(), "导出文件已写入");
    println!("{}", path.display());
    Ok(())
}
