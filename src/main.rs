use std::{
    env, process,
    time::{SystemTime, UNIX_EPOCH},
};

use reg::{FieldPolicy, ProfileSource, RegisterBank, RegisterType};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Debug, PartialEq, Eq)]
struct Args {
    profile: String,
    policy: FieldPolicy,
    log_file: bool,
    push: usize,
}

fn main() {
    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            process::exit(1);
        }
    };

    let _guard = init_logging(args.log_file);
    println!("regbank v{}", env!("CARGO_PKG_VERSION"));

    let mut bank = match RegisterBank::new() {
        Ok(bank) => bank,
        Err(e) => {
            tracing::error!("{e}");
            process::exit(2);
        }
    };

    match bank.load_profile(&args.profile, &ProfileSource::from_env(), args.policy) {
        Ok(diagnostics) => {
            for diagnostic in &diagnostics {
                println!("warning: {diagnostic}");
            }
        }
        Err(e) => {
            tracing::error!("{e}");
            process::exit(2);
        }
    }

    print_layout(&bank);

    if args.push > 0 {
        exercise_stack(&mut bank, args.push);
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut profile = None;
    let mut policy = FieldPolicy::Lenient;
    let mut log_file = false;
    let mut push = 0;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--strict" => policy = FieldPolicy::Strict,
            "--log-file" => log_file = true,
            "--push" => {
                let value = args.next().ok_or("--push needs a count")?;
                push = value
                    .parse()
                    .map_err(|_| format!("invalid push count '{value}'"))?;
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option '{flag}'")),
            _ if profile.is_none() => profile = Some(arg.clone()),
            _ => return Err(format!("unexpected argument '{arg}'")),
        }
    }

    Ok(Args {
        profile: profile.ok_or("no profile given")?,
        policy,
        log_file,
        push,
    })
}

fn print_usage() {
    println!("USAGE:");
    println!("    regbank <profile> [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --strict        Fail on the first malformed profile field");
    println!("    --log-file      Log to a file in the temp directory");
    println!("    --push <N>      Push N arena generations, then pop them back");
    println!();
    println!("Profiles not found as given are looked up in ${}.", reg::profile::PLUGINS_ENV);
}

fn init_logging(to_file: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if to_file {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());
        let filename = format!("regbank-{seconds}.log");
        println!("Logging to file: {:?}", env::temp_dir().join(&filename));

        let appender = tracing_appender::rolling::never(env::temp_dir(), filename);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        None
    }
}

fn print_layout(bank: &RegisterBank) {
    for set in bank.sets().filter(|set| !set.items().is_empty()) {
        println!(
            "{} ({} registers, {} bytes)",
            set.register_type(),
            set.items().len(),
            set.current().len()
        );
        for item in set.items() {
            println!("    {item}");
        }
    }

    for (role, name) in bank.roles().iter() {
        println!("={role} {name}");
    }

    let empty: Vec<_> = RegisterType::ALL
        .into_iter()
        .filter(|ty| bank.set(*ty).items().is_empty())
        .map(RegisterType::name)
        .collect();
    if !empty.is_empty() {
        println!("no registers: {}", empty.join(" "));
    }
}

fn exercise_stack(bank: &mut RegisterBank, generations: usize) {
    for _ in 0..generations {
        match bank.push() {
            Ok(depth) => println!("push -> depth {depth}"),
            Err(e) => {
                tracing::error!("{e}");
                return;
            }
        }
    }

    loop {
        match bank.pop() {
            Ok(depth) => println!("pop  -> depth {depth}"),
            Err(e) => {
                println!("{e}");
                break;
            }
        }
    }
}
