pub mod cli;
pub mod ed;
pub mod sim;
pub mod trace;

#[cfg(test)]
mod test;
