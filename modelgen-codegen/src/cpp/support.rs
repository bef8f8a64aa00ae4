//! Support code emitted into generated C++ headers.

/// Standard headers the support code needs.
pub const STANDARD_INCLUDES: &[&str] = &[
    "<cmath>",
    "<cstddef>",
    "<cstdint>",
    "<cstdlib>",
    "<fstream>",
    "<iomanip>",
    "<limits>",
    "<locale>",
    "<memory>",
    "<optional>",
    "<sstream>",
    "<stdexcept>",
    "<string>",
    "<type_traits>",
    "<vector>",
];

/// Helpers shared by every generated routine.
///
/// Scalars cross YAML and XML as text: `format_value` prints floats with
/// `max_digits10` so they parse back to the same value (infinities and NaN use
/// the XSD spellings `INF`, `-INF` and `NaN`), and `parse_value` range-checks
/// integers instead of truncating. `json_value` applies the same range check
/// to JSON numbers. Bytes are hex in every
/// format. `deep_equal` looks through `shared_ptr` so equality compares
/// values, not addresses. XML is printed by hand to stay independent of
/// `rapidxml_print.hpp`; the root may carry a default `xmlns`. Every `*_string` helper has a `*_file` twin.
pub const DETAIL: &str = r#"#ifndef MODELGEN_DETAIL_SUPPORT_INCLUDED
#define MODELGEN_DETAIL_SUPPORT_INCLUDED

namespace modelgen_detail {

inline std::string to_hex(const std::vector<std::uint8_t>& bytes) {
    static const char digits[] = "0123456789abcdef";
    std::string out;
    out.reserve(bytes.size() * 2);
    for (std::uint8_t byte : bytes) {
        out.push_back(digits[byte >> 4]);
        out.push_back(digits[byte & 0x0f]);
    }
    return out;
}

inline int hex_digit(char c) {
    if (c >= '0' && c <= '9') {
        return c - '0';
    }
    if (c >= 'a' && c <= 'f') {
        return c - 'a' + 10;
    }
    if (c >= 'A' && c <= 'F') {
        return c - 'A' + 10;
    }
    throw std::invalid_argument("modelgen: invalid hex digit");
}

inline std::vector<std::uint8_t> from_hex(const std::string& text) {
    if (text.size() % 2 != 0) {
        throw std::invalid_argument("modelgen: odd number of hex digits");
    }
    std::vector<std::uint8_t> out;
    out.reserve(text.size() / 2);
    for (std::size_t i = 0; i < text.size(); i += 2) {
        out.push_back(static_cast<std::uint8_t>(hex_digit(text[i]) * 16 + hex_digit(text[i + 1])));
    }
    return out;
}

inline std::string format_value(const std::string& value) {
    return value;
}

inline std::string format_value(bool value) {
    return value ? "true" : "false";
}

template <typename T>
std::string format_value(T value) {
    static_assert(std::is_arithmetic<T>::value, "modelgen: unsupported scalar type");
    if constexpr (std::is_floating_point<T>::value) {
        if (std::isnan(value)) {
            return "NaN";
        }
        if (std::isinf(value)) {
            return value < 0 ? "-INF" : "INF";
        }
        std::ostringstream out;
        out.imbue(std::locale::classic());
        out << std::setprecision(std::numeric_limits<T>::max_digits10) << value;
        return out.str();
    } else {
        return std::to_string(value);
    }
}

template <typename T>
T parse_value(const std::string& text) {
    if constexpr (std::is_same<T, std::string>::value) {
        return text;
    } else if constexpr (std::is_same<T, bool>::value) {
        if (text == "true") {
            return true;
        }
        if (text == "false") {
            return false;
        }
        throw std::invalid_argument("modelgen: invalid boolean '" + text + "'");
    } else if constexpr (std::is_floating_point<T>::value) {
        const char* begin = text.c_str();
        char* end = nullptr;
        T result{};
        if constexpr (std::is_same<T, float>::value) {
            result = std::strtof(begin, &end);
        } else {
            result = std::strtod(begin, &end);
        }
        if (text.empty() || end != begin + text.size()) {
            throw std::invalid_argument("modelgen: invalid number '" + text + "'");
        }
        return result;
    } else if constexpr (std::is_signed<T>::value) {
        std::size_t used = 0;
        const long long result = std::stoll(text, &used, 10);
        if (used != text.size() || result < std::numeric_limits<T>::min() ||
            result > std::numeric_limits<T>::max()) {
            throw std::out_of_range("modelgen: integer out of range '" + text + "'");
        }
        return static_cast<T>(result);
    } else {
        if (!text.empty() && text[0] == '-') {
            throw std::out_of_range("modelgen: integer out of range '" + text + "'");
        }
        std::size_t used = 0;
        const unsigned long long result = std::stoull(text, &used, 10);
        if (used != text.size() || result > std::numeric_limits<T>::max()) {
            throw std::out_of_range("modelgen: integer out of range '" + text + "'");
        }
        return static_cast<T>(result);
    }
}

template <typename T>
T json_value(const nlohmann::json& j) {
    if constexpr (std::is_integral<T>::value && !std::is_same<T, bool>::value) {
        if (!j.is_number_integer()) {
            throw std::invalid_argument("modelgen: expected an integer, got " + j.dump());
        }
        if (j.is_number_unsigned()) {
            const std::uint64_t result = j.get<std::uint64_t>();
            if (result > static_cast<std::uint64_t>(std::numeric_limits<T>::max())) {
                throw std::out_of_range("modelgen: integer out of range '" + j.dump() + "'");
            }
            return static_cast<T>(result);
        }
        const std::int64_t result = j.get<std::int64_t>();
        if constexpr (std::is_signed<T>::value) {
            if (result < std::numeric_limits<T>::min() || result > std::numeric_limits<T>::max()) {
                throw std::out_of_range("modelgen: integer out of range '" + j.dump() + "'");
            }
        } else if (result < 0 ||
                   static_cast<std::uint64_t>(result) > std::numeric_limits<T>::max()) {
            throw std::out_of_range("modelgen: integer out of range '" + j.dump() + "'");
        }
        return static_cast<T>(result);
    } else {
        return j.get<T>();
    }
}

template <typename T>
const T& deref(const std::shared_ptr<T>& ptr) {
    if (!ptr) {
        throw std::invalid_argument("modelgen: null reference in a required field");
    }
    return *ptr;
}

template <typename T>
bool deep_equal(const T& lhs, const T& rhs);
template <typename T>
bool deep_equal(const std::shared_ptr<T>& lhs, const std::shared_ptr<T>& rhs);
template <typename T>
bool deep_equal(const std::optional<T>& lhs, const std::optional<T>& rhs);
template <typename T>
bool deep_equal(const std::vector<T>& lhs, const std::vector<T>& rhs);

template <typename T>
bool deep_equal(const T& lhs, const T& rhs) {
    return lhs == rhs;
}

template <typename T>
bool deep_equal(const std::shared_ptr<T>& lhs, const std::shared_ptr<T>& rhs) {
    if (!lhs || !rhs) {
        return !lhs && !rhs;
    }
    return deep_equal(*lhs, *rhs);
}

template <typename T>
bool deep_equal(const std::optional<T>& lhs, const std::optional<T>& rhs) {
    if (!lhs || !rhs) {
        return !lhs && !rhs;
    }
    return deep_equal(*lhs, *rhs);
}

template <typename T>
bool deep_equal(const std::vector<T>& lhs, const std::vector<T>& rhs) {
    if (lhs.size() != rhs.size()) {
        return false;
    }
    for (std::size_t i = 0; i < lhs.size(); ++i) {
        if (!deep_equal(lhs[i], rhs[i])) {
            return false;
        }
    }
    return true;
}

template <typename T>
std::string to_json_string(const T& value) {
    return nlohmann::json(value).dump();
}

template <typename T>
T from_json_string(const std::string& text) {
    return nlohmann::json::parse(text).get<T>();
}

template <typename T>
YAML::Node to_yaml_node(const T& value) {
    YAML::Node node(YAML::NodeType::Map);
    to_yaml(node, value);
    return node;
}

template <typename T>
T from_yaml_node(const YAML::Node& node) {
    T value{};
    from_yaml(node, value);
    return value;
}

template <typename T>
std::string to_yaml_string(const T& value) {
    YAML::Emitter out;
    out << to_yaml_node(value);
    return std::string(out.c_str());
}

template <typename T>
T from_yaml_string(const std::string& text) {
    return from_yaml_node<T>(YAML::Load(text));
}

inline rapidxml::xml_node<>* append_element(rapidxml::xml_document<>& doc,
                                            rapidxml::xml_node<>* parent, const char* name) {
    rapidxml::xml_node<>* child = doc.allocate_node(rapidxml::node_element, name);
    parent->append_node(child);
    return child;
}

inline void append_text(rapidxml::xml_document<>& doc, rapidxml::xml_node<>* parent,
                        const char* name, const std::string& text) {
    rapidxml::xml_node<>* child = append_element(doc, parent, name);
    child->value(doc.allocate_string(text.c_str(), text.size() + 1), text.size());
}

inline const rapidxml::xml_node<>* require_child(const rapidxml::xml_node<>* node,
                                                 const char* name) {
    const rapidxml::xml_node<>* child = node->first_node(name);
    if (!child) {
        throw std::invalid_argument(std::string("modelgen: missing element <") + name + ">");
    }
    return child;
}

inline std::string text_of(const rapidxml::xml_node<>* node) {
    return std::string(node->value(), node->value_size());
}

inline void escape_text(std::string& out, const char* text, std::size_t size) {
    for (std::size_t i = 0; i < size; ++i) {
        switch (text[i]) {
            case '&':
                out.append("&amp;");
                break;
            case '<':
                out.append("&lt;");
                break;
            case '>':
                out.append("&gt;");
                break;
            case '"':
                out.append("&quot;");
                break;
            default:
                out.push_back(text[i]);
        }
    }
}

inline void print_element(std::string& out, const rapidxml::xml_node<>* node) {
    out.push_back('<');
    out.append(node->name(), node->name_size());
    for (const rapidxml::xml_attribute<>* attr = node->first_attribute(); attr;
         attr = attr->next_attribute()) {
        out.push_back(' ');
        out.append(attr->name(), attr->name_size());
        out.append("=\"");
        escape_text(out, attr->value(), attr->value_size());
        out.push_back('"');
    }
    out.push_back('>');
    if (const rapidxml::xml_node<>* child = node->first_node()) {
        for (; child; child = child->next_sibling()) {
            print_element(out, child);
        }
    } else {
        escape_text(out, node->value(), node->value_size());
    }
    out.append("</");
    out.append(node->name(), node->name_size());
    out.push_back('>');
}

template <typename T>
T from_xml_node(const rapidxml::xml_node<>* node) {
    T value{};
    from_xml(node, value);
    return value;
}

template <typename T>
std::string to_xml_string(const T& value, const char* root_name, const char* xmlns = nullptr) {
    rapidxml::xml_document<> doc;
    rapidxml::xml_node<>* root =
        doc.allocate_node(rapidxml::node_element, doc.allocate_string(root_name));
    if (xmlns) {
        root->append_attribute(doc.allocate_attribute("xmlns", doc.allocate_string(xmlns)));
    }
    doc.append_node(root);
    to_xml(doc, root, value);
    std::string out;
    print_element(out, root);
    return out;
}

template <typename T>
T from_xml_string(const std::string& text) {
    std::vector<char> buffer(text.begin(), text.end());
    buffer.push_back('\0');
    rapidxml::xml_document<> doc;
    doc.parse<0>(buffer.data());
    const rapidxml::xml_node<>* root = doc.first_node();
    if (!root) {
        throw std::invalid_argument("modelgen: XML document has no root element");
    }
    return from_xml_node<T>(root);
}

inline std::string read_file(const std::string& path) {
    std::ifstream in(path, std::ios::binary);
    if (!in) {
        throw std::runtime_error("modelgen: cannot open " + path);
    }
    std::ostringstream buffer;
    buffer << in.rdbuf();
    return buffer.str();
}

inline void write_file(const std::string& path, const std::string& text) {
    std::ofstream out(path, std::ios::binary | std::ios::trunc);
    if (!out || !(out << text)) {
        throw std::runtime_error("modelgen: cannot write " + path);
    }
}

template <typename T>
void to_json_file(const T& value, const std::string& path) {
    write_file(path, to_json_string(value));
}

template <typename T>
T from_json_file(const std::string& path) {
    return from_json_string<T>(read_file(path));
}

template <typename T>
void to_yaml_file(const T& value, const std::string& path) {
    write_file(path, to_yaml_string(value));
}

template <typename T>
T from_yaml_file(const std::string& path) {
    return from_yaml_string<T>(read_file(path));
}

template <typename T>
void to_xml_file(const T& value, const char* root_name, const std::string& path,
                 const char* xmlns = nullptr) {
    write_file(path, to_xml_string(value, root_name, xmlns));
}

template <typename T>
T from_xml_file(const std::string& path) {
    return from_xml_string<T>(read_file(path));
}

}  // namespace modelgen_detail

#endif  // MODELGEN_DETAIL_SUPPORT_INCLUDED
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_is_guarded() {
        assert!(DETAIL.starts_with("#ifndef MODELGEN_DETAIL_SUPPORT_INCLUDED\n"));
        assert!(DETAIL.trim_end().ends_with("#endif  // MODELGEN_DETAIL_SUPPORT_INCLUDED"));
    }

    #[test]
    fn test_detail_helpers_present() {
        for helper in [
            "to_hex(",
            "from_hex(",
            "format_value(",
            "parse_value(",
            "deep_equal(",
            "to_json_string(",
            "from_yaml_string(",
            "to_xml_string(",
            "from_xml_string(",
            "to_json_file(",
            "from_yaml_file(",
            "to_xml_file(",
        ] {
            assert!(DETAIL.contains(helper), "{helper}");
        }
        assert!(DETAIL.contains("max_digits10"));
    }

    #[test]
    fn test_json_integers_are_range_checked() {
        assert!(DETAIL.contains("T json_value(const nlohmann::json& j) {"));
        assert!(DETAIL.contains("j.is_number_unsigned()"));
        assert!(DETAIL.contains("std::numeric_limits<T>::max()"));
    }

    #[test]
    fn test_special_floats_use_xsd_spellings() {
        assert!(DETAIL.contains("return value < 0 ? \"-INF\" : \"INF\";"));
        assert!(DETAIL.contains("return \"NaN\";"));
        assert!(STANDARD_INCLUDES.contains(&"<cmath>"));
    }

    #[test]
    fn test_root_namespace_is_printed() {
        assert!(DETAIL.contains("const char* xmlns = nullptr"));
        assert!(DETAIL.contains("doc.allocate_attribute(\"xmlns\""));
        assert!(DETAIL.contains("node->first_attribute()"));
    }

    #[test]
    fn test_includes_are_sorted() {
        let mut sorted = STANDARD_INCLUDES.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, STANDARD_INCLUDES);
    }
}
