pub const fn kilobyte(units: u32) -> u32 {
    units * 1024
}

pub const fn megabyte(units: u32) -> u32 {
    kilobyte(units) * 1024
}
