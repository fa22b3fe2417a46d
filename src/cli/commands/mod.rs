pub mod identity;
pub mod logging;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_PORT: &str = "port";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("idmint")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("IDMINT_PORT")
                .value_parser(clap::value_parser!(u16)),
        );

    let command = identity::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED_ENV: [(&str, Option<&str>); 2] = [
        ("IDMINT_API_KEY", Some("api-key")),
        (
            "GOOGLE_APPLICATION_CREDENTIALS",
            Some("/etc/idmint/service_account.json"),
        ),
    ];

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "idmint");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some(env!("CARGO_PKG_DESCRIPTION").to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_check_args() {
        temp_env::with_vars_unset(
            [
                "IDMINT_API_KEY",
                "GOOGLE_APPLICATION_CREDENTIALS",
                "IDMINT_PORT",
                "IDMINT_IDENTITY_TOOLKIT_URL",
                "IDMINT_RELYING_PARTY_URL",
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec![
                    "idmint",
                    "--port",
                    "9090",
                    "--api-key",
                    "api-key",
                    "--credentials",
                    "/tmp/service_account.json",
                ]);

                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(9090));
                assert_eq!(
                    matches.get_one::<String>(identity::ARG_API_KEY).cloned(),
                    Some("api-key".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(identity::ARG_CREDENTIALS).cloned(),
                    Some("/tmp/service_account.json".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<String>(identity::ARG_IDENTITY_TOOLKIT_URL)
                        .cloned(),
                    Some("https://identitytoolkit.googleapis.com".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<String>(identity::ARG_RELYING_PARTY_URL)
                        .cloned(),
                    Some("https://www.googleapis.com/identitytoolkit/v3/relyingparty".to_string())
                );
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("IDMINT_API_KEY", Some("env-api-key")),
                (
                    "GOOGLE_APPLICATION_CREDENTIALS",
                    Some("/etc/idmint/service_account.json"),
                ),
                ("IDMINT_PORT", Some("443")),
                (
                    "IDMINT_RELYING_PARTY_URL",
                    Some("http://localhost:9099/www.googleapis.com/identitytoolkit/v3/relyingparty"),
                ),
                ("IDMINT_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["idmint"]);
                assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>(identity::ARG_API_KEY).cloned(),
                    Some("env-api-key".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<String>(identity::ARG_RELYING_PARTY_URL)
                        .cloned(),
                    Some(
                        "http://localhost:9099/www.googleapis.com/identitytoolkit/v3/relyingparty"
                            .to_string()
                    )
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
            },
        );
    }

    #[test]
    fn test_missing_api_key() {
        temp_env::with_vars_unset(["IDMINT_API_KEY", "GOOGLE_APPLICATION_CREDENTIALS"], || {
            let result = new().try_get_matches_from(vec!["idmint"]);
            assert_eq!(
                result.map_err(|e| e.kind()).err(),
                Some(clap::error::ErrorKind::MissingRequiredArgument)
            );
        });
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            let mut vars = REQUIRED_ENV.to_vec();
            vars.push(("IDMINT_LOG_LEVEL", Some(level)));
            temp_env::with_vars(vars, || {
                let command = new();
                let matches = command.get_matches_from(vec!["idmint"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            let mut vars = REQUIRED_ENV.to_vec();
            vars.push(("IDMINT_LOG_LEVEL", None));
            temp_env::with_vars(vars, || {
                let mut args = vec!["idmint".to_string()];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }
}
