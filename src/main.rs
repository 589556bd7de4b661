use clap::Parser;

use clear_vision::{
    cli::{Cli, Commands},
    handler::{handle_filter, handle_hide, handle_reconstruct, handle_recover, handle_split},
};

/// 程序的主入口点
///
/// 负责初始化日志、解析命令行参数，并根据指定的子命令
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 默认只输出警告，可通过 RUST_LOG 调整
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // 解析命令行参数
    let cli = Cli::parse();

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Split(args) => handle_split(args),
        Commands::Reconstruct(args) => handle_reconstruct(args),
        Commands::Hide(args) => handle_hide(args),
        Commands::Recover(args) => handle_recover(args),
        Commands::Filter(args) => handle_filter(args),
    }
}
