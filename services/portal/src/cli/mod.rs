//! portal CLI 分发：`run`、`issue-code`、`check-code`、`doctor`、`version`。

use anyhow::{Context, anyhow};
use ow_login_token::LoginTokenGenerator;
use serde_json::json;

use crate::{
    config::PortalConfig,
    guests::{GuestRecord, store::load_guest_store},
    mail::login_link,
};

/// CLI 分发结果。
pub(crate) enum CliDispatch {
    /// 继续进入 portal 主循环。
    Run,
    /// 命令已处理完成，主程序应退出。
    Exit,
}

/// 解析并执行 portal CLI。
pub(crate) fn dispatch(args: &[String]) -> anyhow::Result<CliDispatch> {
    if args.is_empty() {
        return Ok(CliDispatch::Run);
    }

    let cmd = args[0].trim();
    if cmd.is_empty() || cmd == "run" {
        return Ok(CliDispatch::Run);
    }

    if matches!(cmd, "-h" | "--help" | "help") {
        print_root_help();
        return Ok(CliDispatch::Exit);
    }

    match cmd {
        "issue-code" => {
            let [_, guest_id] = args else {
                return Err(anyhow!("usage: ow-portal issue-code <guest-id>"));
            };
            run_issue_code(parse_guest_id(guest_id)?)?;
            Ok(CliDispatch::Exit)
        }
        "check-code" => {
            let [_, guest_id, code] = args else {
                return Err(anyhow!("usage: ow-portal check-code <guest-id> <code>"));
            };
            if !run_check_code(parse_guest_id(guest_id)?, code.trim())? {
                std::process::exit(1);
            }
            Ok(CliDispatch::Exit)
        }
        "doctor" => {
            let format = parse_doctor_format(&args[1..])?;
            run_doctor(format);
            Ok(CliDispatch::Exit)
        }
        "version" => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(CliDispatch::Exit)
        }
        other => Err(anyhow!(
            "unknown command: {other}; run `ow-portal --help` for usage"
        )),
    }
}

/// 解析宾客 ID。
fn parse_guest_id(raw: &str) -> anyhow::Result<u64> {
    raw.trim()
        .parse::<u64>()
        .with_context(|| format!("invalid guest id: {raw}"))
}

/// 读取配置与宾客记录。
fn load_guest(guest_id: u64) -> anyhow::Result<(PortalConfig, GuestRecord)> {
    let config = PortalConfig::from_env()?;
    let store = load_guest_store(&config.guest_store_path).map_err(|err| anyhow!(err))?;
    let guest = store
        .find_by_id(guest_id)
        .cloned()
        .ok_or_else(|| anyhow!("guest {guest_id} not found"))?;
    Ok((config, guest))
}

/// 打印宾客当前 access code 与登录链接。
fn run_issue_code(guest_id: u64) -> anyhow::Result<()> {
    let (config, guest) = load_guest(guest_id)?;
    let generator = LoginTokenGenerator::new(&config.secret_key, config.token_max_age_days);
    let code = generator.make_token(&guest.identity());
    println!("guest: {} <{}>", guest.display_name(), guest.email);
    println!("access-code: {code}");
    println!("login-link: {}", login_link(&config.site_url, &code, None));
    Ok(())
}

/// 校验 access code，打印 `valid` / `invalid`。
fn run_check_code(guest_id: u64, code: &str) -> anyhow::Result<bool> {
    let (config, guest) = load_guest(guest_id)?;
    let generator = LoginTokenGenerator::new(&config.secret_key, config.token_max_age_days);
    let valid = generator.check_token(Some(&guest.identity()), Some(code));
    println!("{}", if valid { "valid" } else { "invalid" });
    Ok(valid)
}

/// `doctor` 输出格式。
#[derive(Debug, Eq, PartialEq)]
enum DoctorFormat {
    Text,
    Json,
}

/// 解析 doctor 的 `--format` 参数。
fn parse_doctor_format(args: &[String]) -> anyhow::Result<DoctorFormat> {
    if args.is_empty() {
        return Ok(DoctorFormat::Text);
    }
    if args.len() == 2 && args[0] == "--format" {
        return match args[1].as_str() {
            "text" => Ok(DoctorFormat::Text),
            "json" => Ok(DoctorFormat::Json),
            other => Err(anyhow!("unsupported doctor format: {other}")),
        };
    }
    Err(anyhow!("usage: ow-portal doctor [--format text|json]"))
}

/// 打印已解析配置（不含密钥），配置无效时退出码为 1。
fn run_doctor(format: DoctorFormat) {
    let config = match PortalConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            match format {
                DoctorFormat::Text => println!("config: invalid ({err:#})"),
                DoctorFormat::Json => println!(
                    "{}",
                    json!({ "configValid": false, "error": format!("{err:#}") })
                ),
            }
            std::process::exit(1);
        }
    };
    let guests = load_guest_store(&config.guest_store_path);
    let guest_count = guests.as_ref().map(|store| store.guests.len()).ok();

    match format {
        DoctorFormat::Text => {
            println!("config: valid");
            println!("portal-addr: {}", config.addr);
            println!("site-url: {}", config.site_url);
            println!("token-max-age-days: {}", config.token_max_age_days);
            println!("guest-store: {}", config.guest_store_path.display());
            match &guests {
                Ok(store) => println!("guests: {}", store.guests.len()),
                Err(err) => println!("guests: unavailable ({err})"),
            }
        }
        DoctorFormat::Json => {
            let payload = json!({
                "configValid": true,
                "portalAddr": config.addr,
                "siteUrl": config.site_url.as_str(),
                "tokenMaxAgeDays": config.token_max_age_days,
                "guestStorePath": config.guest_store_path.display().to_string(),
                "guestCount": guest_count,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".to_string())
            );
        }
    }

    if guests.is_err() {
        std::process::exit(1);
    }
}

/// 打印 root help。
fn print_root_help() {
    println!("ow-portal usage:");
    println!("  ow-portal run");
    println!("  ow-portal issue-code <guest-id>");
    println!("  ow-portal check-code <guest-id> <code>");
    println!("  ow-portal doctor [--format text|json]");
    println!("  ow-portal version");
}
