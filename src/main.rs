fn main() {
    notiq::app::startup::startup();
}
