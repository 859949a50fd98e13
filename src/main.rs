fn main() -> Result<(), Box<dyn std::error::Error>> {
    foundry_compare::cli::main()
}
