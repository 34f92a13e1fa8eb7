fn main() {
    // Emits the ESP-IDF link/cfg directives when building for espidf;
    // outside an ESP-IDF environment this produces nothing.
    embuild::espidf::sysenv::output();
}
