#[cfg(test)]
mod scan_test;
