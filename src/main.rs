fn main() {
    eoh_forecast_lib::run()
}
