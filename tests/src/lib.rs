#[cfg(test)]
mod probe;
#[cfg(test)]
mod utils;
