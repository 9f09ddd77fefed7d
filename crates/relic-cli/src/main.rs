use anyhow::Result;
use clap::{Parser, Subcommand};

use relic_codegen::{Register, RegisterInfo};

#[derive(Parser)]
#[command(name = "relic")]
#[command(about = "Diagnostics for the relic native backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump the register catalog and allocation-order lists.
    Registers {
        #[arg(long, help = "Print only the register bound to this argument slot")]
        slot: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Registers { slot } => {
            let info = RegisterInfo::instance();
            if let Some(slot) = slot {
                let reg = info.argument_register(slot)?;
                println!("{reg}");
            } else {
                dump_catalog(info);
            }
        }
    }

    Ok(())
}

fn dump_catalog(info: &RegisterInfo) {
    println!("register  class  arg-slot  flags");
    for reg in Register::ALL {
        let desc = info.describe(reg);
        let class = info.class_of(reg).to_string();
        let slot = desc
            .argument_slot
            .map_or_else(|| "-".to_string(), |slot| slot.to_string());
        let mut flags = Vec::new();
        if desc.callee_saved {
            flags.push("callee-saved");
        }
        if desc.reserved {
            flags.push("reserved");
        }
        println!(
            "{name:<9} {class:<6} {slot:<9} {flags}",
            name = desc.name,
            flags = flags.join(" ")
        );
    }

    println!();
    let args: Vec<Register> = (0..info.argument_slot_count())
        .filter_map(|slot| info.argument_register(slot).ok())
        .collect();
    print_list("argument registers", &args, info);
    print_list("gpr primary order", info.gpr_alloc_order(), info);
    print_list("xmm primary order", info.xmm_alloc_order(), info);
    print_list(
        "gpr spill-temporary order",
        info.gpr_spill_temp_alloc_order(),
        info,
    );
    print_list(
        "xmm spill-temporary order",
        info.xmm_spill_temp_alloc_order(),
        info,
    );
    print_list("callee-saved save order", info.callee_saved_all(), info);
}

fn print_list(label: &str, regs: &[Register], info: &RegisterInfo) {
    let names: Vec<&str> = regs.iter().map(|&reg| info.name_of(reg)).collect();
    println!("{label}: {}", names.join(" "));
}
