#![allow(unused_macros)]

// Logging-Makros für die Core-Crate
//
// Mit Feature `defmt` werden die Aufrufe an defmt weitergeleitet.
// Ohne Feature bleiben nur die Argument-Referenzen übrig (keine
// "unused variable" Warnungen, kein Code im Binary).

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($s $(, $x)*);
        #[cfg(not(feature = "defmt"))]
        let _ = ($( & $x ),*);
    }};
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($s $(, $x)*);
        #[cfg(not(feature = "defmt"))]
        let _ = ($( & $x ),*);
    }};
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($s $(, $x)*);
        #[cfg(not(feature = "defmt"))]
        let _ = ($( & $x ),*);
    }};
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($s $(, $x)*);
        #[cfg(not(feature = "defmt"))]
        let _ = ($( & $x ),*);
    }};
}

// Werte ohne eigenes defmt::Format (z.B. core::net::Ipv4Addr) über Display
#[cfg(feature = "defmt")]
macro_rules! display {
    ($x:expr) => {
        ::defmt::Display2Format(&$x)
    };
}

#[cfg(not(feature = "defmt"))]
macro_rules! display {
    ($x:expr) => {
        &$x
    };
}
