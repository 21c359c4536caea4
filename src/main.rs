use anyhow::Result;
use clap::{Parser, Subcommand};
use logicnet::{ChipId, ChipKind, Network};

#[derive(Parser)]
#[command(name = "logicnet", version, about = "Boolean logic network simulator demos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Switch -> NAND -> probe chain, toggled step by step
    Demo,
    /// One switch fanning out to several probes
    Fanout {
        #[arg(long, default_value_t = 4)]
        probes: usize,
    },
    /// NAND truth table, driven through a live two-switch circuit
    Truth,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Demo => demo(),
        Commands::Fanout { probes } => fanout(probes),
        Commands::Truth => truth(),
    }
}

fn demo() -> Result<()> {
    let mut net = Network::new();
    let a = net.create_chip(ChipKind::InputSwitch);
    let held = net.create_chip(ChipKind::InputSwitch);
    let nand = net.create_chip(ChipKind::Nand);
    let probe = net.create_chip(ChipKind::OutputProbe);

    let a_out = net.output_pin(a, 0).unwrap();
    let held_out = net.output_pin(held, 0).unwrap();
    let in0 = net.input_pin(nand, 0).unwrap();
    let in1 = net.input_pin(nand, 1).unwrap();
    let out = net.output_pin(nand, 0).unwrap();
    let shown = net.input_pin(probe, 0).unwrap();

    net.connect(a_out, in0)?;
    net.connect(held_out, in1)?;
    net.connect(out, shown)?;
    net.toggle(held, 0)?;

    println!("initial network (input B held High):");
    println!("{}", net.dump());

    for step in 1..=2 {
        net.toggle(a, 0)?;
        println!("after toggle {step} of input A:");
        println!("{}", net.dump());
    }
    Ok(())
}

fn fanout(probes: usize) -> Result<()> {
    let mut net = Network::new();
    let sw = net.create_chip(ChipKind::InputSwitch);
    let src = net.output_pin(sw, 0).unwrap();
    for _ in 0..probes {
        let p = net.create_chip(ChipKind::OutputProbe);
        let pin = net.input_pin(p, 0).unwrap();
        net.connect(src, pin)?;
    }

    net.toggle(sw, 0)?;
    println!("one switch driving {probes} probes, switched High in one call:");
    println!("{}", net.dump());
    Ok(())
}

fn truth() -> Result<()> {
    let mut net = Network::new();
    let a = net.create_chip(ChipKind::InputSwitch);
    let b = net.create_chip(ChipKind::InputSwitch);
    let nand = net.create_chip(ChipKind::Nand);

    let a_out = net.output_pin(a, 0).unwrap();
    let b_out = net.output_pin(b, 0).unwrap();
    let in0 = net.input_pin(nand, 0).unwrap();
    let in1 = net.input_pin(nand, 1).unwrap();
    let out = net.output_pin(nand, 0).unwrap();
    net.connect(a_out, in0)?;
    net.connect(b_out, in1)?;

    println!(" a | b | NAND(a,b)");
    println!("---+---+----------");
    for (want_a, want_b) in [(false, false), (false, true), (true, false), (true, true)] {
        set_level(&mut net, a, want_a)?;
        set_level(&mut net, b, want_b)?;
        println!(
            " {} | {} | {}",
            level_char(want_a),
            level_char(want_b),
            level_char(net.is_high(out)),
        );
    }
    Ok(())
}

/// Toggles the switch only when its output is not already at `high`.
fn set_level(net: &mut Network, switch: ChipId, high: bool) -> Result<()> {
    let pin = net.output_pin(switch, 0).unwrap();
    if net.is_high(pin) != high {
        net.toggle(switch, 0)?;
    }
    Ok(())
}

fn level_char(high: bool) -> char {
    if high { '1' } else { '0' }
}
