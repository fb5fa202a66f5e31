pub mod dump;
pub mod locate;
pub mod program_loader;
pub mod vtable;

#[cfg(test)]
mod test_programs;
