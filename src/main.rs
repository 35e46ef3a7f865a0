fn main() {
    unduhan_lib::run()
}
