fn main() {
    plate_drop::run();
}
