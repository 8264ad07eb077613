/// Short platform name for an internal satellite ID.
///
/// ID 83 has historically been listed for both GMS4 and GMS5 with GMS5
/// taking effect, so GMS4 has no reachable ID.
pub fn satellite_name(id: i32) -> &'static str {
    match id {
        i32::MIN..=-1 => "MSNG",
        21 => "GOES1",
        23 => "GOES2",
        25 => "GOES3",
        27 => "GOES4",
        29 => "GOES5",
        31 => "GOES6",
        33 => "GOES7",
        34 => "FY2B",
        35 => "FY2C",
        36 => "FY2D",
        37 => "FY2E",
        38 => "FY2F",
        39 => "FY2G",
        40 => "FY2H",
        42..=45 => "NOAA",
        51 => "MSG1",
        52 => "MSG2",
        53 => "MSG3",
        54 => "MET3",
        55 => "MET4",
        56 => "MET5",
        57 => "MET6",
        58 => "MET7",
        60..=69 => "NOAA",
        70 => "GOES8",
        72 => "GOES9",
        74 => "GOES10",
        76 => "GOES11",
        78 => "GOES12",
        83 => "GMS5",
        84 => "MTSAT1",
        85 => "MTSAT2",
        87..=94 => "DMSP",
        95 => "FY1B",
        96 => "FY1C",
        97 => "FY1D",
        101..=171 => "MODIS",
        180 => "GOES13",
        182 => "GOES14",
        184 => "GOES15",
        186 => "GOES16",
        195 | 196 => "DMSP",
        230 => "KLPNA1",
        240 => "MetOpA",
        241 => "MetOpB",
        242 => "MetOpC",
        _ => "OTHER",
    }
}
