use clap::Parser;

use smg_rs::effect::Effect;
use smg_rs::generate::generate;
use smg_rs::machine::StateMachine;
use smg_rs::options::CompilerOptions;
use smg_rs::pseudo::PseudoCode;
use smg_rs::trigger::GuardKind;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Do not write comments into the generated code.
    #[clap(long)]
    no_comments: bool,

    /// Keep guard post-conditions on the post-state.
    #[clap(long)]
    no_join: bool,

    /// Print the derived model before the code.
    #[clap(long)]
    model: bool,

    /// Enable debug logging.
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    println!("args = {:?}", args);

    let options = CompilerOptions {
        emit_comments: !args.no_comments,
        trigger_join: !args.no_join,
        ..CompilerOptions::default()
    };
    let mut sm = StateMachine::with_options(options);

    // A door with a lock and an alarm:
    // - `open`, `close`, `lock`, `unlock` move the door
    // - the alarm is armed while the door is locked
    sm.add_simple_type("Door", &["open", "closed", "locked"])?;
    let door = sm.state_type("Door")?;
    sm.add_variable("door", door)?;
    let boolean = sm.state_type("boolean")?;
    sm.add_variable("alarm", boolean)?;

    let open = sm.transition_condition("door", &["closed"], &["open"])?;
    sm.add_trigger("open", open, vec![])?;
    let close = sm.transition_condition("door", &["open"], &["closed"])?;
    sm.add_trigger("close", close, vec![])?;
    let lock = sm.transition_condition("door", &["closed"], &["locked"])?;
    sm.add_trigger("lock", lock, vec![Effect::Send("arm".into())])?;
    let unlock = sm.transition_condition("door", &["locked"], &["closed"])?;
    sm.add_trigger("unlock", unlock, vec![])?;
    let arm = sm.transition_condition("alarm", &["0"], &["1"])?;
    sm.add_trigger("arm", arm, vec![])?;

    let locked = sm.state_condition("door", &["locked"])?;
    sm.add_guard(locked.clone(), Some(GuardKind::Enter), Some("Locked"), vec![Effect::Call("beep".into())])?;
    sm.add_guard(locked, Some(GuardKind::Leave), Some("Unlocked"), vec![Effect::Call("disarm".into())])?;
    let closing = sm.transition_condition("door", &["*"], &["closed"])?;
    sm.add_guard(closing, None, None, vec![Effect::Call("latch".into())])?;

    let time_total = std::time::Instant::now();
    let mut out = PseudoCode::new();
    generate(&mut sm, &mut out)?;

    if args.model {
        println!("{}", sm.debug_string());
    }
    println!("{}", out.as_str());
    println!("Total time: {:?}", time_total.elapsed());

    Ok(())
}
