use colored::Colorize;

pub mod recon;
pub mod report;

pub fn print_banner() {
    let banner = r#"
    ███████╗██╗   ██╗██████╗ ██╗   ██╗███████╗██╗   ██╗ ██████╗ ██████╗
    ██╔════╝██║   ██║██╔══██╗██║   ██║██╔════╝╚██╗ ██╔╝██╔═══██╗██╔══██╗
    ███████╗██║   ██║██████╔╝██║   ██║█████╗   ╚████╔╝ ██║   ██║██████╔╝
    ╚════██║██║   ██║██╔══██╗╚██╗ ██╔╝██╔══╝    ╚██╔╝  ██║   ██║██╔══██╗
    ███████║╚██████╔╝██║  ██║ ╚████╔╝ ███████╗   ██║   ╚██████╔╝██║  ██║
    ╚══════╝ ╚═════╝ ╚═╝  ╚═╝  ╚═══╝  ╚══════╝   ╚═╝    ╚═════╝ ╚═╝  ╚═╝
"#;
    println!("{}", banner.bright_cyan());
    println!(
        "{}",
        "    crawlable-surface reconnaissance · for authorized testing only\n".bright_black()
    );
}
