fn main() {
    tile_swap::run();
}
