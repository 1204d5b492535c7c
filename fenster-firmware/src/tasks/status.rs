// Status-Task: gibt Meldungen des Taster-Tasks aus
//
// Platzhalter für ein Display: die Meldung wird mit ihrer x-Position
// geloggt, gerendert wird nichts.

use defmt::info;

use crate::StatusSignal;

#[embassy_executor::task]
pub async fn status_display_task(signal: &'static StatusSignal) -> ! {
    loop {
        let message = signal.wait().await;
        info!("Status: [x={}] {}", message.x(), message.text());
    }
}
